//! Word lists for the synthetic generators

pub const FIRST_NAMES: &[&str] = &[
    "James", "Arthur", "Fred", "William", "Harold", "George", "Albert", "Thomas", "Edward",
    "Stanley", "Leonard", "Walter", "Ernest", "Sidney", "Percy", "Frank", "Norman", "Cyril",
    "Mary", "Margaret", "Doris", "Dorothy", "Kathleen", "Florence", "Edna", "Gladys", "Irene",
    "Vera", "Joan", "Hilda", "Elsie", "Ivy",
];

pub const LAST_NAMES: &[&str] = &[
    "Halls", "Bennet", "Smith", "Keys", "Cross", "Stevenson", "Marsh", "Yardley", "Aston",
    "Black", "Whitfield", "Prentice", "Ogden", "Carmichael", "Drummond", "Ellery", "Fairburn",
    "Garfield", "Hollis", "Ingram", "Jessop", "Kendrick", "Lambert", "Mercer", "Norwood",
    "Osgood", "Padgett", "Quimby", "Rycroft", "Selby", "Thackeray", "Underhill",
];

pub const EMAIL_DOMAINS: &[&str] = &["example.com", "example.org", "example.net"];

pub const POSTCODE_AREAS: &[&str] = &["SW", "SE", "NW", "N", "E", "W", "LS", "M", "B", "L"];

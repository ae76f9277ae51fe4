//! Synthetic dataset generation.
//!
//! Everything here is plain random sampling: the lists are generated
//! once at startup, cross-linked (credits copy their prisoner's and
//! sender's fields, disbursements their prisoner's and recipient's),
//! aggregated, and then frozen for the process lifetime. The generator
//! is seedable from configuration so a dataset can be reproduced.

pub mod names;

use chrono::{Duration, NaiveDateTime, NaiveTime, Utc};
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};
use std::collections::{BTreeSet, HashSet};

use nomsops_config::DatasetConfig;
use nomsops_core::{Credit, DataProvider, Disbursement, Prisoner, Recipient, Sender, PRISONS};

use names::{EMAIL_DOMAINS, FIRST_NAMES, LAST_NAMES, POSTCODE_AREAS};

/// The five generated record lists, pre-sorted by their stable primary
/// keys so filtered views inherit a deterministic tie order
pub struct Dataset {
    prisoners: Vec<Prisoner>,
    senders: Vec<Sender>,
    recipients: Vec<Recipient>,
    credits: Vec<Credit>,
    disbursements: Vec<Disbursement>,
}

impl Dataset {
    /// Generate a dataset from the configured counts, seeded when the
    /// configuration asks for a reproducible one
    pub fn generate(config: &DatasetConfig) -> Self {
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        let dataset = Self::generate_with_rng(config, &mut rng);
        log::info!(
            "generated dataset: {} prisoners, {} senders, {} recipients, {} credits, {} disbursements",
            dataset.prisoners.len(),
            dataset.senders.len(),
            dataset.recipients.len(),
            dataset.credits.len(),
            dataset.disbursements.len()
        );
        dataset
    }

    fn generate_with_rng(config: &DatasetConfig, rng: &mut StdRng) -> Self {
        let today = Utc::now().date_naive();
        let yesterday = today - Duration::days(1);

        // Prisoners cycle through the prison table; sorting by number
        // happens before linking so credits copy final positions
        let mut prisoners: Vec<Prisoner> = (0..config.prisoner_count)
            .map(|i| Prisoner {
                id: i as i64,
                prison: PRISONS[i % PRISONS.len()].0.to_string(),
                prisoner_name: full_name(rng).to_uppercase(),
                prisoner_number: format!("A{}{}", random_digits(rng, 4), random_letters(rng, 2)),
                sender_count: 0,
                credit_count: 0,
                credit_total: 0,
            })
            .collect();
        prisoners.sort_by(|a, b| a.prisoner_number.cmp(&b.prisoner_number));
        let mut prisoner_senders: Vec<HashSet<i64>> = vec![HashSet::new(); prisoners.len()];

        // Roughly one sender in ten pays by bank transfer; the payment
        // detail fields follow the chosen source
        let mut senders: Vec<Sender> = (0..config.sender_count)
            .map(|i| {
                let bank_transfer = rng.random_bool(0.1);
                let sender_name = full_name(rng);
                let sender_email = if bank_transfer {
                    String::new()
                } else {
                    email_for(rng, &sender_name)
                };
                Sender {
                    id: i as i64,
                    source: if bank_transfer { "bank_transfer" } else { "online" }.to_string(),
                    sender_sort_code: if bank_transfer {
                        random_digits(rng, 6)
                    } else {
                        String::new()
                    },
                    sender_account_number: if bank_transfer {
                        random_digits(rng, 8)
                    } else {
                        String::new()
                    },
                    sender_roll_number: String::new(),
                    card_number_last_digits: if bank_transfer {
                        String::new()
                    } else {
                        random_digits(rng, 4)
                    },
                    sender_email,
                    postcode: if bank_transfer { String::new() } else { postcode(rng) },
                    ip_address: if bank_transfer { String::new() } else { ipv4(rng) },
                    sender_name,
                    prisons: Vec::new(),
                    prisoner_count: 0,
                    prison_count: 0,
                    credit_count: 0,
                    credit_total: 0,
                }
            })
            .collect();
        senders.sort_by(|a, b| a.sender_name.cmp(&b.sender_name));
        let mut sender_prisoners: Vec<HashSet<i64>> = vec![HashSet::new(); senders.len()];
        let mut sender_prisons: Vec<BTreeSet<String>> = vec![BTreeSet::new(); senders.len()];

        let mut credits: Vec<Credit> = (0..config.credit_count)
            .map(|i| {
                let amount = random_amount(rng);
                let received_at = random_datetime(rng, today, 15);
                // only yesterday's credits can still be pending
                let status = if received_at.date() == yesterday {
                    ["pending", "credited"].choose(rng).copied().unwrap_or("credited")
                } else {
                    "credited"
                };

                let p = rng.random_range(0..prisoners.len());
                let s = rng.random_range(0..senders.len());
                prisoners[p].credit_count += 1;
                prisoners[p].credit_total += amount;
                senders[s].credit_count += 1;
                senders[s].credit_total += amount;
                prisoner_senders[p].insert(senders[s].id);
                sender_prisoners[s].insert(prisoners[p].id);
                sender_prisons[s].insert(prisoners[p].prison.clone());

                Credit {
                    id: i as i64,
                    received_at,
                    status: status.to_string(),
                    amount,
                    prison: prisoners[p].prison.clone(),
                    prisoner_name: prisoners[p].prisoner_name.clone(),
                    prisoner_number: prisoners[p].prisoner_number.clone(),
                    source: senders[s].source.clone(),
                    sender_name: senders[s].sender_name.clone(),
                    sender_sort_code: senders[s].sender_sort_code.clone(),
                    sender_account_number: senders[s].sender_account_number.clone(),
                    sender_roll_number: senders[s].sender_roll_number.clone(),
                    card_number_last_digits: senders[s].card_number_last_digits.clone(),
                    sender_email: senders[s].sender_email.clone(),
                    postcode: senders[s].postcode.clone(),
                    ip_address: senders[s].ip_address.clone(),
                }
            })
            .collect();
        credits.sort_by(|a, b| b.received_at.cmp(&a.received_at));

        let mut recipients: Vec<Recipient> = (0..config.recipient_count)
            .map(|i| {
                let recipient_name = full_name(rng);
                Recipient {
                    id: i as i64,
                    recipient_email: email_for(rng, &recipient_name),
                    recipient_name,
                    prisons: Vec::new(),
                    prisoner_count: 0,
                    prison_count: 0,
                    disbursement_count: 0,
                    disbursement_total: 0,
                }
            })
            .collect();
        recipients.sort_by(|a, b| a.recipient_name.cmp(&b.recipient_name));
        let mut recipient_prisoners: Vec<HashSet<i64>> = vec![HashSet::new(); recipients.len()];
        let mut recipient_prisons: Vec<BTreeSet<String>> = vec![BTreeSet::new(); recipients.len()];

        let mut disbursements: Vec<Disbursement> = (0..config.disbursement_count)
            .map(|i| {
                let amount = random_amount(rng);
                let created = random_datetime(rng, today, 30);
                let bank_transfer = rng.random_bool(0.2);
                // recent disbursements are still in the confirmation
                // pipeline, older ones have gone out
                let status = if today - Duration::days(2) <= created.date() {
                    ["entered", "confirmed"].choose(rng).copied().unwrap_or("entered")
                } else {
                    "sent"
                };

                let p = rng.random_range(0..prisoners.len());
                let r = rng.random_range(0..recipients.len());
                recipients[r].disbursement_count += 1;
                recipients[r].disbursement_total += amount;
                recipient_prisoners[r].insert(prisoners[p].id);
                recipient_prisons[r].insert(prisoners[p].prison.clone());

                Disbursement {
                    id: i as i64,
                    created,
                    method: if bank_transfer { "bank_transfer" } else { "cheque" }.to_string(),
                    status: status.to_string(),
                    amount,
                    prison: prisoners[p].prison.clone(),
                    prisoner_name: prisoners[p].prisoner_name.clone(),
                    prisoner_number: prisoners[p].prisoner_number.clone(),
                    recipient_name: recipients[r].recipient_name.clone(),
                    recipient_email: recipients[r].recipient_email.clone(),
                    sort_code: if bank_transfer {
                        random_digits(rng, 6)
                    } else {
                        String::new()
                    },
                    account_number: if bank_transfer {
                        random_digits(rng, 8)
                    } else {
                        String::new()
                    },
                    roll_number: String::new(),
                }
            })
            .collect();
        disbursements.sort_by(|a, b| b.created.cmp(&a.created));

        // materialize the link sets into the aggregate fields, then
        // drop rows that never got linked
        for (index, links) in prisoner_senders.iter().enumerate() {
            prisoners[index].sender_count = links.len();
        }
        for (index, links) in sender_prisoners.iter().enumerate() {
            senders[index].prisoner_count = links.len();
            senders[index].prisons = sender_prisons[index].iter().cloned().collect();
            senders[index].prison_count = senders[index].prisons.len();
        }
        for (index, links) in recipient_prisoners.iter().enumerate() {
            recipients[index].prisoner_count = links.len();
            recipients[index].prisons = recipient_prisons[index].iter().cloned().collect();
            recipients[index].prison_count = recipients[index].prisons.len();
        }
        prisoners.retain(|prisoner| prisoner.sender_count > 0);
        senders.retain(|sender| sender.prisoner_count > 0);
        recipients.retain(|recipient| recipient.disbursement_count > 0);

        Dataset {
            prisoners,
            senders,
            recipients,
            credits,
            disbursements,
        }
    }
}

impl DataProvider for Dataset {
    fn credits(&self) -> &[Credit] {
        &self.credits
    }

    fn senders(&self) -> &[Sender] {
        &self.senders
    }

    fn prisoners(&self) -> &[Prisoner] {
        &self.prisoners
    }

    fn recipients(&self) -> &[Recipient] {
        &self.recipients
    }

    fn disbursements(&self) -> &[Disbursement] {
        &self.disbursements
    }
}

// ==================== Sampling Helpers ====================

fn random_digits(rng: &mut StdRng, len: usize) -> String {
    (0..len).map(|_| char::from(b'0' + rng.random_range(0..10))).collect()
}

fn random_letters(rng: &mut StdRng, len: usize) -> String {
    (0..len).map(|_| char::from(b'A' + rng.random_range(0..26))).collect()
}

fn full_name(rng: &mut StdRng) -> String {
    let first = FIRST_NAMES.choose(rng).copied().unwrap_or("James");
    let last = LAST_NAMES.choose(rng).copied().unwrap_or("Smith");
    format!("{} {}", first, last)
}

fn email_for(rng: &mut StdRng, name: &str) -> String {
    let domain = EMAIL_DOMAINS.choose(rng).copied().unwrap_or("example.com");
    let local: String = name
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(".");
    format!("{}@{}", local, domain)
}

fn postcode(rng: &mut StdRng) -> String {
    let area = POSTCODE_AREAS.choose(rng).copied().unwrap_or("SW");
    format!(
        "{}{} {}{}",
        area,
        rng.random_range(1..20),
        rng.random_range(1..10),
        random_letters(rng, 2)
    )
}

fn ipv4(rng: &mut StdRng) -> String {
    format!(
        "{}.{}.{}.{}",
        rng.random_range(1..=223),
        rng.random_range(0..=255),
        rng.random_range(0..=255),
        rng.random_range(1..=254)
    )
}

/// Mostly round sums with a tail of arbitrary-pence values
fn random_amount(rng: &mut StdRng) -> i64 {
    let roll: f64 = rng.random();
    if roll > 0.8 {
        2000
    } else if roll > 0.7 {
        2500
    } else if roll > 0.4 {
        [3000, 3500, 1500].choose(rng).copied().unwrap_or(3000)
    } else if roll > 0.2 {
        rng.random_range(1..10) * 1000 + rng.random_range(1..10) * 100
    } else {
        (roll * 10_000.0) as i64
    }
}

/// A datetime between yesterday and `max_days_ago` days back
fn random_datetime(rng: &mut StdRng, today: chrono::NaiveDate, max_days_ago: i64) -> NaiveDateTime {
    let date = today - Duration::days(rng.random_range(1..=max_days_ago));
    let time = NaiveTime::from_hms_opt(
        rng.random_range(0..24),
        rng.random_range(0..60),
        rng.random_range(0..60),
    )
    .unwrap_or(NaiveTime::MIN);
    NaiveDateTime::new(date, time)
}

// ==================== Tests ====================

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> DatasetConfig {
        DatasetConfig {
            seed: Some(42),
            ..DatasetConfig::default()
        }
    }

    #[test]
    fn test_seeded_generation_is_deterministic() {
        let first = Dataset::generate(&config());
        let second = Dataset::generate(&config());
        assert_eq!(first.credits, second.credits);
        assert_eq!(first.prisoners, second.prisoners);
        assert_eq!(first.senders, second.senders);
        assert_eq!(first.recipients, second.recipients);
        assert_eq!(first.disbursements, second.disbursements);
    }

    #[test]
    fn test_counts_and_post_process() {
        let dataset = Dataset::generate(&config());
        assert_eq!(dataset.credits.len(), 50);
        assert_eq!(dataset.disbursements.len(), 40);
        // unlinked rows are dropped
        assert!(dataset.prisoners.len() <= 40);
        assert!(dataset.prisoners.iter().all(|p| p.sender_count > 0));
        assert!(dataset.senders.iter().all(|s| s.prisoner_count > 0));
        assert!(dataset
            .recipients
            .iter()
            .all(|r| r.disbursement_count > 0));
    }

    #[test]
    fn test_aggregates_reconcile() {
        let dataset = Dataset::generate(&config());

        let credit_total: i64 = dataset.credits.iter().map(|c| c.amount).sum();
        let prisoner_total: i64 = dataset.prisoners.iter().map(|p| p.credit_total).sum();
        let sender_total: i64 = dataset.senders.iter().map(|s| s.credit_total).sum();
        assert_eq!(credit_total, prisoner_total);
        assert_eq!(credit_total, sender_total);

        let disbursement_total: i64 = dataset.disbursements.iter().map(|d| d.amount).sum();
        let recipient_total: i64 = dataset.recipients.iter().map(|r| r.disbursement_total).sum();
        assert_eq!(disbursement_total, recipient_total);
    }

    #[test]
    fn test_credits_reference_kept_prisoners() {
        let dataset = Dataset::generate(&config());
        for credit in &dataset.credits {
            assert!(dataset
                .prisoners
                .iter()
                .any(|p| p.prisoner_number == credit.prisoner_number));
        }
    }

    #[test]
    fn test_pending_only_for_yesterday() {
        let dataset = Dataset::generate(&config());
        let yesterday = Utc::now().date_naive() - Duration::days(1);
        for credit in &dataset.credits {
            if credit.status == "pending" {
                assert_eq!(credit.received_at.date(), yesterday);
            }
        }
    }

    #[test]
    fn test_lists_are_pre_sorted() {
        let dataset = Dataset::generate(&config());
        assert!(dataset
            .credits
            .windows(2)
            .all(|w| w[0].received_at >= w[1].received_at));
        assert!(dataset
            .disbursements
            .windows(2)
            .all(|w| w[0].created >= w[1].created));
        assert!(dataset
            .prisoners
            .windows(2)
            .all(|w| w[0].prisoner_number <= w[1].prisoner_number));
        assert!(dataset
            .senders
            .windows(2)
            .all(|w| w[0].sender_name <= w[1].sender_name));
    }

    #[test]
    fn test_payment_fields_follow_source() {
        let dataset = Dataset::generate(&config());
        for sender in &dataset.senders {
            if sender.source == "bank_transfer" {
                assert_eq!(sender.sender_sort_code.len(), 6);
                assert_eq!(sender.sender_account_number.len(), 8);
                assert!(sender.card_number_last_digits.is_empty());
                assert!(sender.sender_email.is_empty());
            } else {
                assert!(sender.sender_sort_code.is_empty());
                assert_eq!(sender.card_number_last_digits.len(), 4);
                assert!(sender.sender_email.contains('@'));
            }
        }
    }

    #[test]
    fn test_prisoner_numbers_match_pattern() {
        let dataset = Dataset::generate(&config());
        for prisoner in &dataset.prisoners {
            let number = &prisoner.prisoner_number;
            assert_eq!(number.len(), 7);
            assert!(number.starts_with('A'));
            assert!(number[1..5].chars().all(|c| c.is_ascii_digit()));
            assert!(number[5..].chars().all(|c| c.is_ascii_uppercase()));
        }
    }
}

use std::fmt::Write;

use crate::campaign::BatchOutcome;
use crate::category::BusinessType;
use crate::models::CampaignRecord;
use crate::personalize::format_dollars;

pub fn group_by_type(records: &[CampaignRecord]) -> Vec<(BusinessType, Vec<&CampaignRecord>)> {
    let mut groups: Vec<(BusinessType, Vec<&CampaignRecord>)> = Vec::new();

    for record in records {
        let kind = record.intelligence.business_type;
        match groups.iter_mut().find(|(group, _)| *group == kind) {
            Some((_, members)) => members.push(record),
            None => groups.push((kind, vec![record])),
        }
    }

    groups
}

pub fn build_status(records: &[CampaignRecord]) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "Campaign Draft Status:");
    let _ = writeln!(output, "{}", "=".repeat(50));

    for (kind, members) in group_by_type(records) {
        let _ = writeln!(output);
        let _ = writeln!(output, "{}:", kind.key().to_uppercase());
        for record in members {
            let _ = writeln!(output, "  \u{2022} {} - {}", record.business_name, record.email);
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "Total: {} drafts created", records.len());
    output
}

pub fn build_mailbox_check(records: &[CampaignRecord], mailbox: &[String]) -> String {
    let mut output = String::new();
    let missing: Vec<&CampaignRecord> = records
        .iter()
        .filter(|record| !mailbox.contains(&record.draft_id))
        .collect();

    let _ = writeln!(output, "Mailbox check:");
    let _ = writeln!(
        output,
        "{} of {} drafts still in the mailbox",
        records.len() - missing.len(),
        records.len()
    );
    for record in missing {
        let _ = writeln!(
            output,
            "  missing: {} ({})",
            record.business_name, record.draft_id
        );
    }
    output
}

pub fn build_create_summary(outcome: &BatchOutcome, ledger: &str) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "Campaign Summary:");
    let _ = writeln!(output, "Total drafts created: {}", outcome.entries.len());

    if !outcome.skipped.is_empty() {
        let _ = writeln!(output, "Skipped: {}", outcome.skipped.len());
        for notice in &outcome.skipped {
            let _ = writeln!(
                output,
                "  - {} ({}): {}",
                notice.business_name, notice.category, notice.reason
            );
        }
    }

    let _ = writeln!(output, "Draft details saved to: {ledger}");

    if let Some(sample) = outcome.entries.first() {
        let record = &sample.record;
        let _ = writeln!(output);
        let _ = writeln!(output, "--- Sample Campaign: {} ---", record.business_name);
        let _ = writeln!(output, "Subject: {}", record.subject);
        let _ = writeln!(output, "Landing URL: {}", record.landing_url);
        let _ = writeln!(
            output,
            "Revenue Projection: {}/month",
            format_dollars(record.intelligence.revenue_projections.monthly_revenue)
        );
        let _ = writeln!(output, "Draft ID: {}", record.draft_id);
    }

    output
}

pub fn draft_menu(records: &[CampaignRecord]) -> String {
    let mut output = String::new();
    let _ = writeln!(output, "Available drafts:");
    for (i, record) in records.iter().enumerate() {
        let _ = writeln!(
            output,
            "{}. {} ({})",
            i + 1,
            record.business_name,
            record.intelligence.business_type
        );
    }
    output
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    Cancel,
    Indices(Vec<usize>),
}

/// Parses `none` or comma-separated 1-based draft numbers into 0-based
/// indices. Any malformed or out-of-range entry rejects the whole input.
pub fn parse_selection(input: &str, available: usize) -> Option<Selection> {
    let input = input.trim();
    if input.eq_ignore_ascii_case("none") {
        return Some(Selection::Cancel);
    }

    input
        .split(',')
        .map(|part| match part.trim().parse::<usize>() {
            Ok(n) if (1..=available).contains(&n) => Some(n - 1),
            _ => None,
        })
        .collect::<Option<Vec<_>>>()
        .map(Selection::Indices)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PersonalizedCopy;
    use crate::personalize::tests::sample_intelligence;

    fn record(name: &str, kind: BusinessType) -> CampaignRecord {
        let mut intelligence = sample_intelligence();
        intelligence.business_name = name.to_string();
        intelligence.business_type = kind;
        CampaignRecord {
            business_name: name.to_string(),
            email: format!("hi@{}.com", name.to_lowercase().replace(' ', "")),
            intelligence,
            personalized_copy: PersonalizedCopy {
                subject_line: String::new(),
                personalized_opening: String::new(),
                revenue_hook: String::new(),
                social_proof: String::new(),
            },
            landing_url: String::new(),
            draft_id: format!("d-{name}"),
            subject: String::new(),
            email_body: String::new(),
        }
    }

    #[test]
    fn status_groups_by_type_in_first_seen_order() {
        let records = vec![
            record("Tartine", BusinessType::Bakery),
            record("Cellarmaker", BusinessType::Brewery),
            record("Arsicault", BusinessType::Bakery),
        ];

        let groups = group_by_type(&records);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].0, BusinessType::Bakery);
        assert_eq!(groups[0].1.len(), 2);

        let status = build_status(&records);
        let bakery = status.find("BAKERY:").unwrap();
        let brewery = status.find("BREWERY:").unwrap();
        assert!(bakery < brewery);
        assert!(status.contains("  \u{2022} Arsicault - hi@arsicault.com\n"));
        assert!(status.ends_with("Total: 3 drafts created\n"));
    }

    #[test]
    fn mailbox_check_lists_drafts_gone_from_gmail() {
        let records = vec![
            record("Tartine", BusinessType::Bakery),
            record("Cellarmaker", BusinessType::Brewery),
        ];
        let mailbox = vec!["d-Cellarmaker".to_string(), "d-unrelated".to_string()];

        let check = build_mailbox_check(&records, &mailbox);
        assert!(check.contains("1 of 2 drafts still in the mailbox\n"));
        assert!(check.contains("  missing: Tartine (d-Tartine)\n"));
        assert!(!check.contains("Cellarmaker"));
    }

    #[test]
    fn menu_numbers_from_one() {
        let menu = draft_menu(&[record("Tartine", BusinessType::Bakery)]);
        assert!(menu.contains("1. Tartine (bakery)"));
    }

    #[test]
    fn selection_parsing() {
        assert_eq!(parse_selection(" None ", 3), Some(Selection::Cancel));
        assert_eq!(parse_selection("1, 3", 3), Some(Selection::Indices(vec![0, 2])));
        assert_eq!(parse_selection("4", 3), None);
        assert_eq!(parse_selection("0", 3), None);
        assert_eq!(parse_selection("2,x", 3), None);
    }
}

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{OutreachError, Result};
use crate::mailer::DRY_RUN_PREFIX;
use crate::models::{BusinessProspect, CampaignRecord, LandingPage};

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ProspectEntry {
    name: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    kind: Option<String>,
    location: String,
    email: String,
}

fn read_existing(path: &Path) -> Result<String> {
    if !path.exists() {
        return Err(OutreachError::MissingInputFile(path.to_path_buf()));
    }
    Ok(fs::read_to_string(path)?)
}

fn write_pretty<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, serde_json::to_string_pretty(value)?)?;
    Ok(())
}

/// Loads the category -> businesses file, flattened in file order.
pub fn load_prospects(path: &Path) -> Result<Vec<BusinessProspect>> {
    let groups: Map<String, Value> = serde_json::from_str(&read_existing(path)?)?;
    let mut prospects = Vec::new();

    for (category, businesses) in groups {
        let entries: Vec<ProspectEntry> = serde_json::from_value(businesses)?;
        prospects.extend(entries.into_iter().map(|entry| BusinessProspect {
            name: entry.name,
            category: category.clone(),
            location: entry.location,
            email: entry.email,
            kind: entry.kind,
        }));
    }

    Ok(prospects)
}

pub fn save_ledger(path: &Path, records: &[CampaignRecord]) -> Result<()> {
    write_pretty(path, records)
}

pub fn load_ledger(path: &Path) -> Result<Vec<CampaignRecord>> {
    Ok(serde_json::from_str(&read_existing(path)?)?)
}

/// True when the ledger at `path` lists drafts staged in a real mailbox.
pub fn holds_mailbox_drafts(path: &Path) -> Result<bool> {
    if !path.exists() {
        return Ok(false);
    }
    Ok(load_ledger(path)?
        .iter()
        .any(|record| !record.draft_id.starts_with(DRY_RUN_PREFIX)))
}

pub fn write_landing_page(dir: &Path, slug: &str, page: &LandingPage) -> Result<PathBuf> {
    let path = dir.join(format!("{slug}.json"));
    write_pretty(&path, page)?;
    Ok(path)
}

/// Merges `category,name,type,location,email` rows into the prospect file,
/// creating it if needed. Rows whose email is already listed under the same
/// category are skipped. Returns the number of rows added.
pub fn import_csv(csv_path: &Path, prospects_path: &Path) -> Result<usize> {
    #[derive(Deserialize)]
    struct CsvRow {
        category: String,
        name: String,
        #[serde(rename = "type", default)]
        kind: Option<String>,
        location: String,
        email: String,
    }

    let mut groups: Map<String, Value> = if prospects_path.exists() {
        serde_json::from_str(&fs::read_to_string(prospects_path)?)?
    } else {
        Map::new()
    };

    let mut reader = csv::Reader::from_path(csv_path)?;
    let mut inserted = 0usize;

    for result in reader.deserialize::<CsvRow>() {
        let row = result?;
        let category = row.category.trim().to_string();
        let listed = groups
            .entry(category)
            .or_insert_with(|| Value::Array(Vec::new()));

        let mut entries: Vec<ProspectEntry> = serde_json::from_value(listed.take())?;
        if !entries.iter().any(|entry| entry.email.eq_ignore_ascii_case(&row.email)) {
            entries.push(ProspectEntry {
                name: row.name,
                kind: row.kind.filter(|k| !k.is_empty()),
                location: row.location,
                email: row.email,
            });
            inserted += 1;
        }
        *listed = serde_json::to_value(entries)?;
    }

    write_pretty(prospects_path, &groups)?;
    Ok(inserted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::personalize::{landing_page, tests::sample_intelligence};

    const PROSPECTS: &str = r#"{
  "craft_breweries": [
    {"name": "Cellarmaker", "type": "brewery", "location": "San Francisco, CA", "email": "hi@cellarmaker.com"}
  ],
  "boutique_bakeries": [
    {"name": "Tartine Bakery", "type": "bakery", "location": "San Francisco, CA", "email": "hi@tartine.com"},
    {"name": "Arsicault", "location": "San Francisco, CA", "email": "hi@arsicault.com"}
  ]
}"#;

    #[test]
    fn prospects_flatten_in_file_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("business_prospects.json");
        fs::write(&path, PROSPECTS).unwrap();

        let prospects = load_prospects(&path).unwrap();
        assert_eq!(prospects.len(), 3);
        assert_eq!(prospects[0].category, "craft_breweries");
        assert_eq!(prospects[1].name, "Tartine Bakery");
        assert_eq!(prospects[1].kind.as_deref(), Some("bakery"));
        assert_eq!(prospects[2].kind, None);
    }

    #[test]
    fn missing_prospect_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.json");
        assert!(matches!(
            load_prospects(&path),
            Err(OutreachError::MissingInputFile(p)) if p == path
        ));
    }

    #[test]
    fn landing_page_file_matches_pretty_json() {
        let dir = tempfile::tempdir().unwrap();
        let page = landing_page(&sample_intelligence());
        let path = write_landing_page(&dir.path().join("landing_pages"), "dandelion-chocolate", &page)
            .unwrap();

        assert!(path.ends_with("landing_pages/dandelion-chocolate.json"));
        let written = fs::read_to_string(&path).unwrap();
        assert_eq!(written, serde_json::to_string_pretty(&page).unwrap());
    }

    fn ledger_record(draft_id: &str) -> CampaignRecord {
        let intelligence = sample_intelligence();
        CampaignRecord {
            business_name: intelligence.business_name.clone(),
            email: "hi@dandelionchocolate.com".to_string(),
            personalized_copy: crate::personalize::derive_copy(&intelligence),
            intelligence,
            landing_url: String::new(),
            draft_id: draft_id.to_string(),
            subject: String::new(),
            email_body: String::new(),
        }
    }

    #[test]
    fn mailbox_drafts_are_detected_in_ledger() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("personalized_campaigns.json");
        assert!(!holds_mailbox_drafts(&path).unwrap());

        save_ledger(&path, &[ledger_record("dry-run-1"), ledger_record("dry-run-2")]).unwrap();
        assert!(!holds_mailbox_drafts(&path).unwrap());

        save_ledger(&path, &[ledger_record("dry-run-1"), ledger_record("r-8172")]).unwrap();
        assert!(holds_mailbox_drafts(&path).unwrap());
    }

    #[test]
    fn csv_import_merges_and_skips_duplicates() {
        let dir = tempfile::tempdir().unwrap();
        let prospects_path = dir.path().join("business_prospects.json");
        fs::write(&prospects_path, PROSPECTS).unwrap();

        let csv_path = dir.path().join("new.csv");
        fs::write(
            &csv_path,
            "category,name,type,location,email\n\
             boutique_bakeries,Tartine Bakery,bakery,San Francisco,HI@tartine.com\n\
             specialty_tea,Samovar,tea_shop,San Francisco,hi@samovar.com\n\
             boutique_bakeries,b. patisserie,,San Francisco,hi@bpatisserie.com\n",
        )
        .unwrap();

        let inserted = import_csv(&csv_path, &prospects_path).unwrap();
        assert_eq!(inserted, 2);

        let prospects = load_prospects(&prospects_path).unwrap();
        assert_eq!(prospects.len(), 5);
        assert_eq!(prospects[3].name, "b. patisserie");
        assert_eq!(prospects[3].kind, None);
        assert_eq!(prospects[4].category, "specialty_tea");
    }
}

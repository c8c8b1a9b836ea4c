use anyhow::{bail, Context, Result};
use csv::StringRecord;

pub type ItemIndex = usize;
pub type UserPos = usize;

/// One aggregated input line: a listener and every artist they played,
/// in the order the upstream aggregation emitted them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InteractionRecord {
    pub user_id: String,
    pub items: Vec<String>,
}

/// Reads the aggregated interaction file, one comma-delimited record per user:
/// `userId,item1,count1,item2,count2,...`. No header line.
///
/// Playcounts are validated as integers and then dropped; downstream only
/// cares about presence. A malformed record aborts the whole read, because an
/// item dictionary built from a misparsed file cannot be trusted.
pub fn read_interaction_records(path: &str) -> Result<Vec<InteractionRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b',')
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("unable to open interaction file {}", path))?;

    let mut records = Vec::new();
    for (line, result) in reader.records().enumerate() {
        let raw = result.with_context(|| format!("unable to read record at line {}", line + 1))?;
        records.push(parse_interaction_record(line + 1, &raw)?);
    }

    Ok(records)
}

pub fn parse_interaction_record(line: usize, raw: &StringRecord) -> Result<InteractionRecord> {
    let user_id = match raw.get(0) {
        Some(id) if !id.is_empty() => id.to_string(),
        _ => bail!("line {}: missing user id", line),
    };

    let fields: Vec<&str> = raw.iter().skip(1).collect();
    let mut items = Vec::with_capacity(fields.len() / 2);
    for pair in fields.chunks(2) {
        match *pair {
            [label, count] => {
                count.parse::<u64>().with_context(|| {
                    format!("line {}: playcount '{}' for item '{}' is not a number", line, count, label)
                })?;
                items.push(label.to_string());
            }
            [label] => bail!("line {}: item '{}' has no playcount", line, label),
            _ => unreachable!("chunks(2) yields one or two fields"),
        }
    }

    Ok(InteractionRecord { user_id, items })
}

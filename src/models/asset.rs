use serde::Deserialize;

/// `GET /hardware` response. Only the fields we match on are modelled.
#[derive(Debug, Deserialize)]
pub struct HardwareResponse {
    #[serde(default)]
    pub rows: Vec<AssetRecord>,
}

#[derive(Debug, Deserialize)]
pub struct AssetRecord {
    #[serde(default)]
    pub serial: Option<String>,
    #[serde(default)]
    pub assigned_to: Option<AssignedTo>,
}

#[derive(Debug, Deserialize)]
pub struct AssignedTo {
    #[serde(default)]
    pub email: Option<String>,
}

impl AssetRecord {
    /// True when the asset is checked out to exactly `email` (case-insensitive).
    pub fn is_assigned_to(&self, email: &str) -> bool {
        self.assigned_to
            .as_ref()
            .and_then(|a| a.email.as_deref())
            .is_some_and(|assigned| assigned.to_lowercase() == email.to_lowercase())
    }
}

/// Serials of the rows assigned to `email`, in registry order.
///
/// Snipe-IT's `search` is a substring match across several columns, so rows
/// belonging to other users must be filtered out here.
pub fn matching_serials(rows: Vec<AssetRecord>, email: &str) -> Vec<String> {
    rows.into_iter()
        .filter(|row| row.is_assigned_to(email))
        .filter_map(|row| row.serial)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> Vec<AssetRecord> {
        serde_json::from_str::<HardwareResponse>(json).unwrap().rows
    }

    #[test]
    fn test_matching_is_case_insensitive() {
        let rows = parse(
            r#"{"total":1,"rows":[{"serial":"HW-1","assigned_to":{"email":"Jane.Doe@Org.com"}}]}"#,
        );
        assert_eq!(matching_serials(rows, "jane.doe@org.com"), vec!["HW-1"]);
    }

    #[test]
    fn test_false_positives_are_dropped() {
        let rows = parse(
            r#"{"rows":[
                {"serial":"HW-1","assigned_to":{"email":"alice@org.com"}},
                {"serial":"HW-2","assigned_to":{"email":"malice@org.com"}},
                {"serial":"HW-3","assigned_to":{"email":"alice@org.com.evil"}},
                {"serial":"HW-4","assigned_to":null},
                {"serial":"HW-5","assigned_to":{"id":7,"name":"Berlin Office"}},
                {"serial":"HW-6","notes":"alice@org.com"},
                {"serial":"HW-7","assigned_to":{"email":"ALICE@org.com"}}
            ]}"#,
        );
        assert_eq!(matching_serials(rows, "alice@org.com"), vec!["HW-1", "HW-7"]);
    }

    #[test]
    fn test_order_is_preserved() {
        let rows = parse(
            r#"{"rows":[
                {"serial":"Z-9","assigned_to":{"email":"a@org.com"}},
                {"serial":"A-1","assigned_to":{"email":"a@org.com"}}
            ]}"#,
        );
        assert_eq!(matching_serials(rows, "a@org.com"), vec!["Z-9", "A-1"]);
    }

    #[test]
    fn test_rows_without_serial_are_skipped() {
        let rows = parse(
            r#"{"rows":[
                {"serial":null,"assigned_to":{"email":"a@org.com"}},
                {"assigned_to":{"email":"a@org.com"}},
                {"serial":"K-25","assigned_to":{"email":"a@org.com"}}
            ]}"#,
        );
        assert_eq!(matching_serials(rows, "a@org.com"), vec!["K-25"]);
    }

    #[test]
    fn test_missing_rows_is_empty() {
        assert!(parse(r#"{"total":0}"#).is_empty());
    }
}

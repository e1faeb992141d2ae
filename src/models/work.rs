//! Works (series/franchises items belong to).

use serde::{Deserialize, Serialize};

use crate::utils::gojuon::{kana_row, GOJUON};

/// Group header for works without a usable kana reading.
pub const OTHER_GROUP: &str = "その他";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Work {
    pub id: i64,
    pub name: String,
    /// Kana reading used for syllabary grouping and sorting.
    pub name_kana: Option<String>,
    pub memo: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

/// Group works by the gojuon row of their kana reading, for the top-page
/// index. Rows come out in syllabary order with empty rows omitted; works
/// without a reading (or one outside the table) land in a trailing
/// `その他` group. Members are sorted by reading within each row.
pub fn group_by_kana_row(works: &[Work]) -> Vec<(&'static str, Vec<&Work>)> {
    let mut groups: Vec<(&'static str, Vec<&Work>)> = Vec::new();

    for row in GOJUON {
        let mut members: Vec<&Work> = works
            .iter()
            .filter(|w| w.name_kana.as_deref().and_then(kana_row) == Some(row.key))
            .collect();
        if members.is_empty() {
            continue;
        }
        members.sort_by(|a, b| a.name_kana.cmp(&b.name_kana));
        groups.push((row.key, members));
    }

    let mut other: Vec<&Work> = works
        .iter()
        .filter(|w| w.name_kana.as_deref().and_then(kana_row).is_none())
        .collect();
    if !other.is_empty() {
        other.sort_by(|a, b| a.name.cmp(&b.name));
        groups.push((OTHER_GROUP, other));
    }

    groups
}

/// Create/update payload.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkPayload {
    pub name: String,
    pub name_kana: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memo: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorksPage {
    #[serde(default)]
    pub items: Vec<Work>,
    pub page: Option<u32>,
    pub size: Option<u32>,
    pub total: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_work() {
        let json = r#"{"id": 1, "name": "ぼっち・ざ・ろっく！", "nameKana": "ぼっちざろっく"}"#;
        let work: Work = serde_json::from_str(json).unwrap();
        assert_eq!(work.name_kana.as_deref(), Some("ぼっちざろっく"));
    }

    fn work(id: i64, name: &str, kana: Option<&str>) -> Work {
        Work {
            id,
            name: name.to_string(),
            name_kana: kana.map(str::to_string),
            ..Default::default()
        }
    }

    #[test]
    fn test_group_by_kana_row() {
        let works = vec![
            work(1, "あんさんぶるスターズ", Some("あんさんぶるすたーず")),
            work(2, "かげきしょうじょ", Some("かげきしょうじょ")),
            work(3, "アイドルマスター", Some("あいどるますたー")),
            work(4, "さくら荘のペットな彼女", Some("さくらそうのぺっとなかのじょ")),
            work(5, "鬼滅の刃", Some("きめつのやいば")),
        ];

        let groups = group_by_kana_row(&works);
        let keys: Vec<&str> = groups.iter().map(|(k, _)| *k).collect();
        assert_eq!(keys, ["あ", "か", "さ"]);

        // か row holds both か- and き-initial readings, sorted by reading
        let ka = &groups[1].1;
        assert_eq!(ka.len(), 2);
        assert_eq!(ka[0].name, "かげきしょうじょ");
        assert_eq!(ka[1].name, "鬼滅の刃");
    }

    #[test]
    fn test_group_sorts_members_by_reading() {
        let works = vec![
            work(1, "あんさんぶるスターズ", Some("あんさんぶるすたーず")),
            work(2, "アイドルマスター", Some("あいどるますたー")),
            work(3, "あずまんが大王", Some("あずまんがだいおう")),
        ];

        let groups = group_by_kana_row(&works);
        assert_eq!(groups.len(), 1);
        let names: Vec<&str> = groups[0].1.iter().map(|w| w.name.as_str()).collect();
        assert_eq!(
            names,
            ["アイドルマスター", "あずまんが大王", "あんさんぶるスターズ"]
        );
    }

    #[test]
    fn test_missing_kana_goes_to_other_group() {
        let works = vec![
            work(1, "テスト作品", None),
            work(2, "かげきしょうじょ", Some("かげきしょうじょ")),
        ];

        let groups = group_by_kana_row(&works);
        let keys: Vec<&str> = groups.iter().map(|(k, _)| *k).collect();
        assert_eq!(keys, ["か", OTHER_GROUP]);
        assert_eq!(groups[1].1[0].name, "テスト作品");
    }

    #[test]
    fn test_group_empty_input() {
        assert!(group_by_kana_row(&[]).is_empty());
    }
}

//! Gojuon (五十音) syllabary table.
//!
//! Works are grouped by the kana row of their reading on the inventory top
//! page; this table defines the rows and their member characters.

/// One syllabary row: the row header and the kana it contains.
pub struct GojuonRow {
    pub key: &'static str,
    pub chars: &'static [char],
}

pub const GOJUON: &[GojuonRow] = &[
    GojuonRow { key: "あ", chars: &['あ', 'い', 'う', 'え', 'お'] },
    GojuonRow { key: "か", chars: &['か', 'き', 'く', 'け', 'こ'] },
    GojuonRow { key: "さ", chars: &['さ', 'し', 'す', 'せ', 'そ'] },
    GojuonRow { key: "た", chars: &['た', 'ち', 'つ', 'て', 'と'] },
    GojuonRow { key: "な", chars: &['な', 'に', 'ぬ', 'ね', 'の'] },
    GojuonRow { key: "は", chars: &['は', 'ひ', 'ふ', 'へ', 'ほ'] },
    GojuonRow { key: "ま", chars: &['ま', 'み', 'む', 'め', 'も'] },
    GojuonRow { key: "や", chars: &['や', 'ゆ', 'よ'] },
    GojuonRow { key: "ら", chars: &['ら', 'り', 'る', 'れ', 'ろ'] },
    GojuonRow { key: "わ", chars: &['わ', 'を', 'ん'] },
];

/// Row key for a kana reading, decided by its first character.
/// None for an empty reading or one that starts outside the table.
pub fn kana_row(kana: &str) -> Option<&'static str> {
    let first = kana.chars().next()?;
    GOJUON
        .iter()
        .find(|row| row.chars.contains(&first))
        .map(|row| row.key)
}

//! Client-side model of the server leaderboard
//!
//! The server owns persistence and ordering; this is the fetched snapshot
//! plus the small helpers the UI needs. On the wire an entry is a
//! `[name, score]` pair.

use serde::{Deserialize, Serialize};

/// A single leaderboard entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "(String, i64)", into = "(String, i64)")]
pub struct LeaderboardEntry {
    pub name: String,
    pub score: i64,
}

impl From<(String, i64)> for LeaderboardEntry {
    fn from((name, score): (String, i64)) -> Self {
        Self { name, score }
    }
}

impl From<LeaderboardEntry> for (String, i64) {
    fn from(entry: LeaderboardEntry) -> Self {
        (entry.name, entry.score)
    }
}

/// A fetched leaderboard snapshot
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Leaderboard {
    pub entries: Vec<LeaderboardEntry>,
}

impl Leaderboard {
    /// Wrap fetched entries, re-sorting defensively (descending by score,
    /// stable for ties so the server's ordering survives).
    pub fn new(mut entries: Vec<LeaderboardEntry>) -> Self {
        entries.sort_by(|a, b| b.score.cmp(&a.score));
        Self { entries }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn top(&self, n: usize) -> &[LeaderboardEntry] {
        &self.entries[..self.entries.len().min(n)]
    }

    pub fn top_score(&self) -> Option<i64> {
        self.entries.first().map(|e| e.score)
    }

    /// Rank (1-indexed) a score would take among the fetched entries.
    pub fn potential_rank(&self, score: i64) -> usize {
        self.entries
            .iter()
            .position(|e| score > e.score)
            .unwrap_or(self.entries.len())
            + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board() -> Leaderboard {
        Leaderboard::new(vec![
            ("nimbus".to_string(), 900).into(),
            ("anon".to_string(), 420).into(),
            ("stratus".to_string(), 70).into(),
        ])
    }

    #[test]
    fn wire_format_is_tuples() {
        let json = r#"[["nimbus", 900], ["anon", 420]]"#;
        let entries: Vec<LeaderboardEntry> = serde_json::from_str(json).expect("tuple entries");
        assert_eq!(entries[0].name, "nimbus");
        assert_eq!(entries[1].score, 420);

        let back = serde_json::to_string(&entries).expect("serialize");
        assert_eq!(back, r#"[["nimbus",900],["anon",420]]"#);
    }

    #[test]
    fn sorts_descending() {
        let board = Leaderboard::new(vec![
            ("a".to_string(), 10).into(),
            ("b".to_string(), 30).into(),
            ("c".to_string(), 20).into(),
        ]);
        let scores: Vec<i64> = board.entries.iter().map(|e| e.score).collect();
        assert_eq!(scores, vec![30, 20, 10]);
    }

    #[test]
    fn top_clamps_to_length() {
        let board = board();
        assert_eq!(board.top(2).len(), 2);
        assert_eq!(board.top(10).len(), 3);
        assert_eq!(board.top_score(), Some(900));
    }

    #[test]
    fn potential_rank_is_insertion_position() {
        let board = board();
        assert_eq!(board.potential_rank(1000), 1);
        assert_eq!(board.potential_rank(500), 2);
        assert_eq!(board.potential_rank(420), 3);
        assert_eq!(board.potential_rank(0), 4);
        assert_eq!(Leaderboard::default().potential_rank(5), 1);
    }
}

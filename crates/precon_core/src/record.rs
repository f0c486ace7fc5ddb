/// One harvested deck: cleaned display name and canonical URL.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct DeckRecord {
    pub name: String,
    pub url: String,
}

use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct BadgeAcknowledge {
    pub badge_ids: Vec<String>,
}

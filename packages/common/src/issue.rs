use crate::error::ModelError;
use crate::section::{LinkSection, Section};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Publication state of a weekly issue
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueStatus {
    #[default]
    Draft,
    Ready,
    Released,
}

impl IssueStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            IssueStatus::Draft => "draft",
            IssueStatus::Ready => "ready",
            IssueStatus::Released => "released",
        }
    }
}

impl FromStr for IssueStatus {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(IssueStatus::Draft),
            "ready" => Ok(IssueStatus::Ready),
            "released" => Ok(IssueStatus::Released),
            other => Err(ModelError::UnknownStatus(other.to_string())),
        }
    }
}

/// Document handed to the persistence layer on save
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IssuePayload {
    pub slug: String,
    pub sections: Vec<Section>,
    pub status: IssueStatus,
    pub summary: String,
    pub email: bool,
    pub tweet: bool,
    pub fb: bool,
    pub echojs: bool,
    pub hn: bool,
    pub lobsters: bool,
}

/// Externally submitted link waiting in the inbox
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Submission {
    pub id: String,
    pub section: LinkSection,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_defaults() {
        let payload: IssuePayload = serde_json::from_str(r#"{"slug":"12"}"#).unwrap();
        assert_eq!(payload.slug, "12");
        assert_eq!(payload.status, IssueStatus::Draft);
        assert!(payload.sections.is_empty());
        assert!(!payload.email);
    }

    #[test]
    fn test_status_round_trips_through_text() {
        for status in [IssueStatus::Draft, IssueStatus::Ready, IssueStatus::Released] {
            assert_eq!(status.as_str().parse::<IssueStatus>(), Ok(status));
        }
        assert!("published".parse::<IssueStatus>().is_err());
    }
}

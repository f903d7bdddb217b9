// src/models/preview.rs

use std::path::PathBuf;

use serde::Serialize;

pub const DEFAULT_ORG_NAME: &str = "TRS Chit Fund";
pub const DEFAULT_ORG_ADDRESS: &str = "2B, ChinnaSamy Naidu Street, Dharmapuri-636701, Tamil Nadu";
pub const DEFAULT_ORG_CONTACT: &str = "Contact: Ramesh- +91 9444545907 & Siva-7200120078";

/// Identity printed at the top of every receipt. Not part of the form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Organization {
    pub name: String,
    pub address: String,
    pub contact: String,
    pub logo_path: Option<PathBuf>,
}

impl Default for Organization {
    fn default() -> Self {
        Self {
            name: DEFAULT_ORG_NAME.to_string(),
            address: DEFAULT_ORG_ADDRESS.to_string(),
            contact: DEFAULT_ORG_CONTACT.to_string(),
            logo_path: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GridCell {
    pub label: &'static str,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignatureBlock {
    pub receiver_label: &'static str,
    /// Customer name standing in for a handwritten signature.
    pub receiver: String,
    pub signatory_heading: String,
    /// Collection agent countersigning for the organization.
    pub signatory: String,
    pub signatory_caption: &'static str,
    pub signed_by: String,
}

/// Read-only projection of the draft. Print and PDF both consume this value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewDocument {
    pub header: Organization,
    pub title: &'static str,
    pub subtitle: &'static str,
    pub date: String,
    pub grid: [GridCell; 8],
    pub notes: String,
    pub signatures: SignatureBlock,
    pub footer: &'static str,
}

impl PreviewDocument {
    pub fn cell(&self, label: &str) -> Option<&str> {
        self.grid
            .iter()
            .find(|cell| cell.label == label)
            .map(|cell| cell.value.as_str())
    }
}

// src/services/preview_service.rs

use crate::{
    common::format::{format_currency, format_date, or_placeholder, plan_amount_label, PLACEHOLDER},
    models::{
        invoice::InvoiceDraft,
        preview::{GridCell, Organization, PreviewDocument, SignatureBlock},
    },
};

pub const TITLE: &str = "Receipt";
pub const SUBTITLE: &str = "Customer Payment Acknowledge";
pub const FOOTER: &str = "This is a computer-generated receipt and doesn't require physical seal.";
pub const SIGNATORY_CAPTION: &str = "Authorized Signatory";

/// Projects the draft onto the read-only preview document.
#[derive(Clone)]
pub struct PreviewService {
    organization: Organization,
}

impl PreviewService {
    pub fn new(organization: Organization) -> Self {
        Self { organization }
    }

    pub fn organization(&self) -> &Organization {
        &self.organization
    }

    pub fn render(&self, draft: &InvoiceDraft) -> PreviewDocument {
        let label = |value: Option<&'static str>| value.unwrap_or(PLACEHOLDER).to_string();

        let grid = [
            cell("Name", or_placeholder(&draft.customer_name)),
            cell("Chit Month", or_placeholder(&draft.chit_number)),
            cell("Plan", or_placeholder(&draft.plan_name)),
            cell("Plan Amount", plan_amount_label(&draft.plan_amount)),
            cell("Cash Received", format_currency(&draft.cash_received)),
            cell("Payment Type", label(draft.payment_type.map(|p| p.label()))),
            cell("User Type", label(draft.user_type.map(|u| u.label()))),
            cell("Collection Name", or_placeholder(&draft.agent_name)),
        ];

        PreviewDocument {
            header: self.organization.clone(),
            title: TITLE,
            subtitle: SUBTITLE,
            date: format_date(draft.date),
            grid,
            notes: or_placeholder(&draft.notes),
            signatures: SignatureBlock {
                receiver_label: "Receiver Signature",
                receiver: or_placeholder(&draft.customer_name),
                signatory_heading: format!("For {}", self.organization.name),
                signatory: or_placeholder(&draft.agent_name),
                signatory_caption: SIGNATORY_CAPTION,
                signed_by: or_placeholder(&draft.signature),
            },
            footer: FOOTER,
        }
    }
}

fn cell(label: &'static str, value: String) -> GridCell {
    GridCell { label, value }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::models::invoice::FieldName;

    fn draft() -> InvoiceDraft {
        InvoiceDraft::new(NaiveDate::from_ymd_opt(2024, 1, 5).unwrap())
    }

    fn render(draft: &InvoiceDraft) -> PreviewDocument {
        PreviewService::new(Organization::default()).render(draft)
    }

    #[test]
    fn sections_come_in_fixed_order() {
        let doc = render(&draft());

        let labels: Vec<_> = doc.grid.iter().map(|c| c.label).collect();
        assert_eq!(
            labels,
            [
                "Name",
                "Chit Month",
                "Plan",
                "Plan Amount",
                "Cash Received",
                "Payment Type",
                "User Type",
                "Collection Name"
            ]
        );
        assert_eq!(doc.header.name, "TRS Chit Fund");
        assert_eq!(doc.title, "Receipt");
        assert_eq!(doc.date, "05/01/2024");
        assert_eq!(doc.footer, FOOTER);
    }

    #[test]
    fn empty_fields_render_placeholders() {
        let mut draft = draft();
        for field in FieldName::ALL {
            draft.set(field, "").unwrap();
        }

        let doc = render(&draft);

        assert!(doc.grid.iter().all(|c| c.value == "-"), "{:?}", doc.grid);
        assert_eq!(doc.date, "-");
        assert_eq!(doc.notes, "-");
        assert_eq!(doc.signatures.receiver, "-");
        assert_eq!(doc.signatures.signatory, "-");
        assert_eq!(doc.signatures.signed_by, "-");
    }

    #[test]
    fn defaulted_fields_show_their_defaults() {
        let doc = render(&draft());

        assert_eq!(doc.cell("Name"), Some("-"));
        assert_eq!(doc.cell("Cash Received"), Some("₹"));
        assert_eq!(doc.cell("Payment Type"), Some("Cash"));
        assert_eq!(doc.cell("User Type"), Some("Chit User"));
        assert_eq!(doc.notes, "Nil");
        assert_eq!(doc.signatures.signed_by, "Ramesh.T");
    }

    #[test]
    fn meena_receipt_is_formatted() {
        let mut draft = draft();
        draft.set(FieldName::CustomerName, "Meena").unwrap();
        draft.set(FieldName::PlanAmount, "200000").unwrap();
        draft.set(FieldName::CashReceived, "5000").unwrap();
        draft.set(FieldName::PaymentType, "Cash").unwrap();

        let doc = render(&draft);

        assert_eq!(doc.cell("Name"), Some("Meena"));
        assert_eq!(doc.cell("Plan Amount"), Some("2,00,000"));
        assert_eq!(doc.cell("Cash Received"), Some("₹5,000"));
        assert_eq!(doc.cell("Payment Type"), Some("Cash"));
        assert_eq!(doc.signatures.receiver, "Meena");
    }

    #[test]
    fn unknown_plan_amount_renders_placeholder() {
        let mut draft = draft();
        draft.set(FieldName::PlanAmount, "750000").unwrap();

        assert_eq!(render(&draft).cell("Plan Amount"), Some("-"));
    }

    #[test]
    fn signatory_heading_follows_the_organization() {
        let organization = Organization {
            name: "Sri Lakshmi Chits".into(),
            ..Organization::default()
        };
        let doc = PreviewService::new(organization).render(&draft());

        assert_eq!(doc.signatures.signatory_heading, "For Sri Lakshmi Chits");
    }
}

pub mod exports;
pub mod widget;
pub use widget::InvoiceWidget;

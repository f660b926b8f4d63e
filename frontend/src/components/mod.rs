pub mod bill_list;
pub mod bill_preview;
pub mod calendar;
pub mod date_range_picker;
pub mod delete_reason_modal;
pub mod deleted_list;
pub mod header;
pub mod items_list;
pub mod login_form;
pub mod receipt_form;
pub mod search_bar;
pub mod unsettled_bills;

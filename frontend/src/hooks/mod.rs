pub mod use_bill_preview;
pub mod use_calendar;
pub mod use_date_range;
pub mod use_record_list;

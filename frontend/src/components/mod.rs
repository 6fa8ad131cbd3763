pub mod page_header;

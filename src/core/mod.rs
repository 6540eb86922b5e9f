/// Profile and account provisioning, staff and customer administration
pub mod accounts;
/// Chef-side quote visibility and bid submission
pub mod bidding;
/// Admin-curated food catalog
pub mod catalog;
/// Quotes expanded with lines, bids and customer
pub mod details;
/// Chef menu management
pub mod menu;
/// Order status state machine and delivery dashboard
pub mod order_status;
/// Customer quote requests and order list
pub mod quote_request;
/// Chef quote selection and quote confirmation
pub mod selection;

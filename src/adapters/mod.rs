// Adapters layer: concrete implementations of the ports (catalog HTTP, Supabase store, alert email).

pub mod email;
pub mod http;
pub mod supabase;

pub use email::AlertNotifier;
pub use http::HttpPageSource;
pub use supabase::SupabaseStore;

mod handlers;
mod types;

pub use handlers::{generate_dummy, get_current, get_history, get_stats};
pub use types::{
    GenerateQuery, GenerateResponse, HistoryQuery, HistoryResponse, ReadingResponse,
    StatsResponse, TEMPERATURE_UNIT,
};

// Re-export utoipa path structs for OpenAPI documentation
pub use handlers::{__path_generate_dummy, __path_get_current, __path_get_history, __path_get_stats};

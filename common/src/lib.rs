//! Arbitrage OS Common Library
//!
//! CLIとWeb(WASM)で共有されるセッションガード・アイテム契約・画面射影

pub mod analysis;
pub mod api;
pub mod error;
pub mod projection;
pub mod session;
pub mod types;
pub mod view_state;

pub use analysis::{parse_analysis, AnalysisPayload, StructuredAddress};
pub use api::{ApiConfig, Endpoint, Method, API_URL_ENV, DEFAULT_API_URL};
pub use error::{extract_detail, Error, ErrorKind, Result};
pub use projection::{
    build_route_request, geocoded_projection, list_projection, parse_image_urls, parse_url_list,
    stop_lines, validate_listing_url, GeocodedItem, ListEntry, RoiForm, ScoreTier, Selection,
};
pub use session::{
    GuardOutcome, MemoryStore, RegisterForm, Route, Session, SessionStore,
    REGISTER_REDIRECT_DELAY,
};
pub use types::{
    BatchDiscoveryRequest, Coordinate, Credential, DiscoveredItem, DiscoveryOutcome,
    HallmarkFinding, ItemReference, LoginForm, OptimizedRoute, RegisterRequest, RoiRequest,
    RoiResult, RouteRequest, TokenResponse, UserProfile, VerificationResult,
};
pub use view_state::{Liveness, ViewState};

pub mod loader;
pub mod types;

pub use loader::{load_bars_from, load_proxy_from, DataLoader, LoaderError, LoaderResult};
pub use types::{Bar, BarSeries, DataError, DataResult, ProxyPoint, VolatilityProxySeries};

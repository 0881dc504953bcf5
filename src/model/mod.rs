pub mod bar;

pub use bar::{PriceBar, PriceSeries, SeriesSummary};

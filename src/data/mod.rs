/// Data layer: core types, loading, filtering, aggregation and export.
///
/// Architecture:
/// ```text
///   vehicles_us.csv
///        │
///        ▼
///   ┌──────────┐
///   │  loader  │  parse + coerce price/model_year → Dataset
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ Dataset  │  Vec<Record>, column order, fuels, price bounds
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter  │  fuel + price range → FilteredView (indices)
///   └──────────┘
///        │
///        ├──────────────┐
///        ▼              ▼
///   ┌───────────┐  ┌──────────┐
///   │ aggregate │  │  export  │  CSV payload for download
///   └───────────┘  └──────────┘
/// ```

pub mod aggregate;
pub mod export;
pub mod filter;
pub mod loader;
pub mod model;

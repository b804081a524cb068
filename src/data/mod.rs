/// Data layer: row types, decoding, cleaning, aggregation and the table view.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  decode file → Vec<RawRecord>
///   └──────────┘
///        │
///        ▼
///   ┌───────────┐
///   │ normalize  │  text cells → CleanedRecord (typed, optional numbers)
///   └───────────┘
///        │
///        ├──────────────────────────┐
///        ▼                          ▼
///   ┌───────────┐             ┌──────────┐
///   │ aggregate  │ per Type    │  filter   │ criteria → sorted visible rows
///   └───────────┘             └──────────┘
/// ```

pub mod aggregate;
pub mod filter;
pub mod loader;
pub mod model;
pub mod normalize;

// ============================================================
// Layer 3 - Domain Layer
// ============================================================
// Plain Rust types and traits describing the sentiment task.
//
// Rules for this layer:
//   - NO Burn framework types allowed here
//   - NO file I/O
//   - Only plain structs, enums, and traits
//
// Reference: Rust Book §5 (Structs), §10 (Traits)

// Reviews, sentiment labels and predictions
pub mod review;

// Core abstractions (traits) that other layers implement
pub mod traits;

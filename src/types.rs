/// Identifier of a metric source (usually an environment name), used verbatim as a grouping key.
/// Examples: `MiniGrid-DoorKey-6x6-v0`, `Foo-v0`
pub type TaskId = String;
/// Zero-based index of one independently seeded run inside a concatenated array.
pub type SeedIndex = u32;
/// Training-progress index (epoch or iteration).
pub type Step = u64;
/// Elapsed seconds relative to the first record of a source.
pub type WallTime = f64;

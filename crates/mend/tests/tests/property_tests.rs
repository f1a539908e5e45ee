#[path = "property/generation_purity.rs"]
mod generation_purity;

#[path = "property/recombination.rs"]
mod recombination;

#[path = "property/weighted_draw.rs"]
mod weighted_draw;

#[path = "property/suspiciousness.rs"]
mod suspiciousness;

#[path = "e2e/common.rs"]
mod common;

#[path = "e2e/localize_then_repair.rs"]
mod localize_then_repair;

#[path = "e2e/termination.rs"]
mod termination;

#[path = "e2e/artifact_reuse.rs"]
mod artifact_reuse;

#[path = "e2e/solution_output.rs"]
mod solution_output;

#[path = "e2e/single_fault.rs"]
mod single_fault;

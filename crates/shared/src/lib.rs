//! Types shared by the deploy client and its front ends: the editable project,
//! editor/viewport enums, and the deployment wire format.

pub mod domain;
pub mod error;
pub mod protocol;

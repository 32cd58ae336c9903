use std::sync::Arc;

use crate::application::ports::JobRepository;
use crate::application::services::{AdmissionGate, VoxelJobService};
use crate::presentation::config::Settings;

#[derive(Clone)]
pub struct AppState {
    pub job_service: Arc<VoxelJobService>,
    pub job_repository: Arc<dyn JobRepository>,
    pub gate: AdmissionGate,
    pub settings: Settings,
}

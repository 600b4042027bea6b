use crate::gui_bridge::model::VisualizationModel;
use crate::workflow::runner::Runner;
use anyhow::{anyhow, Result};
use log::{error, info};
use serde_json::json;
use std::{
    net::SocketAddr,
    sync::{Arc, Mutex, RwLock},
};
use tokio::task::JoinHandle;
use warp::{http::StatusCode, Filter};
use zonecore::prelude::Zone;
use zonecore::sensor_interface::{FrameReport, Measurement};

pub fn gui_bind_address() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 9000))
}

#[derive(Debug)]
struct BridgeError;

impl warp::reject::Reject for BridgeError {}

pub type SharedRunner = Arc<Mutex<Runner>>;
type SharedModel = Arc<RwLock<VisualizationModel>>;

/// HTTP face of the monitor: serves the latest frame to a display and
/// accepts scans framed by an external sensor transport.
pub struct GuiBridge {
    state: SharedModel,
    runner: SharedRunner,
}

impl GuiBridge {
    pub fn new(runner: SharedRunner, zone: Zone) -> Self {
        Self {
            state: Arc::new(RwLock::new(VisualizationModel::new(zone))),
            runner,
        }
    }

    /// `GET /frame` returns the current model; `POST /scan` processes a JSON
    /// array of measurements.
    pub fn routes(
        &self,
    ) -> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone {
        let state = self.state.clone();
        let state_filter = warp::any().map(move || state.clone());
        let runner = self.runner.clone();
        let runner_filter = warp::any().map(move || runner.clone());

        let frame_route = warp::path("frame")
            .and(warp::path::end())
            .and(warp::get())
            .and(state_filter.clone())
            .and_then(fetch_frame);

        let scan_route = warp::path("scan")
            .and(warp::path::end())
            .and(warp::post())
            .and(warp::body::json())
            .and(state_filter)
            .and(runner_filter)
            .and_then(ingest_scan);

        frame_route.or(scan_route)
    }

    /// Starts the HTTP server on the current tokio runtime.
    pub fn spawn(&self, addr: SocketAddr) -> JoinHandle<()> {
        let routes = self.routes();
        info!("GUI bridge listening on http://{}", addr);
        tokio::spawn(warp::serve(routes).run(addr))
    }

    /// Runs `scan` through the shared runner and publishes the resulting frame.
    pub fn process(&self, scan: &[Measurement]) -> Result<Option<FrameReport>> {
        process_and_publish(&self.runner, &self.state, scan)
    }

    pub fn publish_status(&self, message: &str) {
        info!("[GUI] {}", message);
    }

    #[cfg(test)]
    pub fn snapshot(&self) -> Result<VisualizationModel> {
        let guard = self
            .state
            .read()
            .map_err(|_| anyhow!("visualization state lock poisoned"))?;
        Ok(guard.clone())
    }
}

fn publish_into(state: &SharedModel, frame: usize, report: &FrameReport) -> Result<()> {
    let mut guard = state
        .write()
        .map_err(|_| anyhow!("visualization state lock poisoned"))?;
    guard.update(frame, report);
    Ok(())
}

fn process_and_publish(
    runner: &SharedRunner,
    state: &SharedModel,
    scan: &[Measurement],
) -> Result<Option<FrameReport>> {
    let (frame, report) = {
        let mut runner = runner.lock().map_err(|_| anyhow!("runner lock poisoned"))?;
        let frame = runner.frames_seen();
        (frame, runner.step(scan))
    };
    if let Some(report) = &report {
        publish_into(state, frame, report)?;
    }
    Ok(report)
}

async fn fetch_frame(state: SharedModel) -> Result<impl warp::Reply, warp::Rejection> {
    let model = state
        .read()
        .map_err(|_| warp::reject::custom(BridgeError))?
        .clone();
    Ok(warp::reply::json(&model))
}

async fn ingest_scan(
    scan: Vec<Measurement>,
    state: SharedModel,
    runner: SharedRunner,
) -> Result<impl warp::Reply, warp::Rejection> {
    match process_and_publish(&runner, &state, &scan) {
        Ok(Some(report)) => Ok(warp::reply::with_status(
            warp::reply::json(&json!({
                "status": "ok",
                "alarm": report.alarm,
                "clusters": report.cluster_count,
                "points": report.points.as_ref().map_or(0, |points| points.len()),
            })),
            StatusCode::OK,
        )),
        Ok(None) => Ok(warp::reply::with_status(
            warp::reply::json(&json!({
                "status": "skipped",
                "reason": "scan too short",
            })),
            StatusCode::UNPROCESSABLE_ENTITY,
        )),
        Err(err) => {
            error!("ingest error: {}", err);
            Err(warp::reject::custom(BridgeError))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::scene::{ScanGenerator, SceneConfig};
    use crate::workflow::config::WorkflowConfig;

    fn bridge() -> GuiBridge {
        let cfg = WorkflowConfig::default();
        let runner = Arc::new(Mutex::new(Runner::new(&cfg).unwrap()));
        GuiBridge::new(runner, cfg.pipeline.zone)
    }

    fn scan_with_target_in_zone() -> Vec<Measurement> {
        let scene = SceneConfig {
            target_start_mm: [1000.0, 0.0],
            target_end_mm: [1000.0, 0.0],
            ..Default::default()
        };
        ScanGenerator::new(scene).next_scan()
    }

    #[test]
    fn gui_bridge_updates_state() {
        let gui = bridge();
        let report = gui.process(&scan_with_target_in_zone()).unwrap().unwrap();
        let model = gui.snapshot().unwrap();
        assert!(report.alarm);
        assert!(model.alarm);
        assert_eq!(model.frame, 0);
        assert_eq!(model.cluster_count, report.cluster_count);

        publish_into(&gui.state, 7, &FrameReport::empty()).unwrap();
        let model = gui.snapshot().unwrap();
        assert_eq!(model.frame, 7);
        assert!(!model.alarm);
    }

    #[tokio::test]
    async fn scan_route_processes_and_frame_route_reports() {
        let gui = bridge();
        let routes = gui.routes();

        let response = warp::test::request()
            .method("POST")
            .path("/scan")
            .json(&scan_with_target_in_zone())
            .reply(&routes)
            .await;
        assert_eq!(response.status(), StatusCode::OK);

        let response = warp::test::request()
            .method("GET")
            .path("/frame")
            .reply(&routes)
            .await;
        assert_eq!(response.status(), StatusCode::OK);
        let model: VisualizationModel = serde_json::from_slice(response.body()).unwrap();
        assert!(model.alarm);
        assert!(!model.points.is_empty());
    }

    #[tokio::test]
    async fn short_scan_is_rejected() {
        let gui = bridge();
        let routes = gui.routes();
        let response = warp::test::request()
            .method("POST")
            .path("/scan")
            .json(&vec![Measurement::new(15, 0.0, 1000.0)])
            .reply(&routes)
            .await;
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }
}

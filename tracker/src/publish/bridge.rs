use crate::publish::model::{ModelPublisher, TargetModel};
use anyhow::{anyhow, Context, Result};
use log::info;
use std::{
    net::SocketAddr,
    sync::{mpsc, Arc, RwLock},
    thread,
};
use targetcore::control::SharedThresholds;
use targetcore::prelude::{AreaPolicy, ColorRange};
use tokio::runtime::Builder;
use warp::{Filter, Rejection, Reply};

/// HTTP routes of the control surface.
///
/// `GET /thresholds`, `PUT /thresholds` (color range), `PUT /area` and
/// `GET /target`.
pub fn routes(
    thresholds: SharedThresholds,
    state: Arc<RwLock<TargetModel>>,
) -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
    let thresholds_filter = warp::any().map(move || thresholds.clone());
    let state_filter = warp::any().map(move || state.clone());

    let get_thresholds = warp::path("thresholds")
        .and(warp::path::end())
        .and(warp::get())
        .and(thresholds_filter.clone())
        .map(|thresholds: SharedThresholds| warp::reply::json(&thresholds.snapshot()));

    let put_thresholds = warp::path("thresholds")
        .and(warp::path::end())
        .and(warp::put())
        .and(warp::body::json())
        .and(thresholds_filter.clone())
        .map(|range: ColorRange, thresholds: SharedThresholds| {
            let updated = thresholds.set_color_range(range);
            info!("color range updated to {:?}", updated.color_range);
            warp::reply::json(&updated)
        });

    let put_area = warp::path("area")
        .and(warp::path::end())
        .and(warp::put())
        .and(warp::body::json())
        .and(thresholds_filter)
        .map(|area: AreaPolicy, thresholds: SharedThresholds| {
            let updated = thresholds.set_area_policy(area);
            info!("area policy updated to {:?}", updated.area);
            warp::reply::json(&updated)
        });

    let get_target = warp::path("target")
        .and(warp::path::end())
        .and(warp::get())
        .and(state_filter)
        .map(|state: Arc<RwLock<TargetModel>>| {
            let model = match state.read() {
                Ok(guard) => guard.clone(),
                Err(poisoned) => poisoned.into_inner().clone(),
            };
            warp::reply::json(&model)
        });

    get_thresholds.or(put_thresholds).or(put_area).or(get_target)
}

/// Control surface served from its own thread while the frame loop runs.
pub struct ControlBridge {
    state: Arc<RwLock<TargetModel>>,
    address: SocketAddr,
}

impl ControlBridge {
    pub fn spawn(bind: &str, thresholds: SharedThresholds) -> Result<Self> {
        let requested: SocketAddr = bind
            .parse()
            .with_context(|| format!("parsing control surface address {}", bind))?;
        let state = Arc::new(RwLock::new(TargetModel::default()));
        let filter = routes(thresholds, state.clone());
        let (ready_tx, ready_rx) = mpsc::channel();

        thread::spawn(move || {
            let runtime = match Builder::new_current_thread().enable_all().build() {
                Ok(runtime) => runtime,
                Err(err) => {
                    let _ = ready_tx.send(Err(format!("building runtime: {}", err)));
                    return;
                }
            };
            runtime.block_on(async move {
                match warp::serve(filter).try_bind_ephemeral(requested) {
                    Ok((bound, server)) => {
                        let _ = ready_tx.send(Ok(bound));
                        server.await;
                    }
                    Err(err) => {
                        let _ = ready_tx.send(Err(err.to_string()));
                    }
                }
            });
        });

        let address = ready_rx
            .recv()
            .context("control surface thread exited early")?
            .map_err(|err| anyhow!("binding control surface on {}: {}", requested, err))?;
        info!("control surface listening on http://{}", address);

        Ok(Self { state, address })
    }

    pub fn address(&self) -> SocketAddr {
        self.address
    }

    /// Publisher that feeds `GET /target`.
    pub fn publisher(&self) -> ModelPublisher {
        ModelPublisher::new(self.state.clone())
    }
}

//! Tab label measurement
//!
//! Every tab label reports its bounding box once the tab row has been laid
//! out. Reports arrive in any order. [`MeasurementRegistry`] holds one
//! pending one-shot per tab key and [`PendingMeasurements`] resolves to the
//! complete [`Measurements`] only after every key has reported, so a partial
//! list never reaches the indicator.

use std::collections::{HashMap, HashSet};
use std::time::Duration;

use tokio::sync::oneshot;

use crate::tabs::{TabKey, TabSet};
use crate::{Error, Result};

/// Position and size of a tab label relative to the tab row
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BoundingBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl BoundingBox {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    /// Whether a point (in tab row coordinates) lies inside the box
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.x && x < self.x + self.width && y >= self.y && y < self.y + self.height
    }
}

/// One bounding box per tab, in tab order
///
/// Only produced once every tab has reported.
#[derive(Debug, Clone, PartialEq)]
pub struct Measurements {
    boxes: Vec<BoundingBox>,
}

impl Measurements {
    pub(crate) fn from_boxes(boxes: Vec<BoundingBox>) -> Self {
        Self { boxes }
    }

    pub fn len(&self) -> usize {
        self.boxes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&BoundingBox> {
        self.boxes.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, BoundingBox> {
        self.boxes.iter()
    }

    /// Index of the tab whose label contains the point
    pub fn hit_test(&self, x: f64, y: f64) -> Option<usize> {
        self.boxes.iter().position(|b| b.contains(x, y))
    }
}

/// Receiving side of a measurement round
///
/// Resolves once, with every tab's box, through [`PendingMeasurements::wait`].
pub struct PendingMeasurements {
    pending: Vec<(TabKey, oneshot::Receiver<BoundingBox>)>,
}

/// Reporting side of a measurement round
///
/// Each tab key can be resolved exactly once. Dropping the registry before
/// every key resolved abandons the round.
pub struct MeasurementRegistry {
    known: HashSet<TabKey>,
    senders: HashMap<TabKey, oneshot::Sender<BoundingBox>>,
}

impl MeasurementRegistry {
    /// Start a measurement round for every tab in the set
    pub fn new(tabs: &TabSet) -> (Self, PendingMeasurements) {
        let mut senders = HashMap::with_capacity(tabs.len());
        let mut pending = Vec::with_capacity(tabs.len());

        for key in tabs.keys() {
            let (tx, rx) = oneshot::channel();
            senders.insert(key.clone(), tx);
            pending.push((key.clone(), rx));
        }

        let registry = Self {
            known: tabs.keys().cloned().collect(),
            senders,
        };

        (registry, PendingMeasurements { pending })
    }

    /// Report the measured box for a tab
    ///
    /// Returns `Ok(true)` when this report fulfilled the tab's pending
    /// measurement and `Ok(false)` when it had already been fulfilled.
    pub fn resolve(&mut self, key: &TabKey, bbox: BoundingBox) -> Result<bool> {
        if !self.known.contains(key) {
            return Err(Error::UnknownTab(key.to_string()));
        }

        let Some(tx) = self.senders.remove(key) else {
            tracing::debug!("Ignoring repeated measurement for tab {}", key);
            return Ok(false);
        };

        if tx.send(bbox).is_err() {
            tracing::debug!("Measurement waiter for tab {} is gone", key);
            return Ok(false);
        }

        Ok(true)
    }

    /// True once every tab has been resolved
    pub fn is_settled(&self) -> bool {
        self.senders.is_empty()
    }

}

impl PendingMeasurements {
    /// Wait until every tab has reported
    ///
    /// With a timeout, fails with [`Error::MeasurementTimeout`] naming the tabs
    /// still missing. Fails with [`Error::MeasurementAbandoned`] if the
    /// registry was dropped first.
    pub async fn wait(mut self, timeout: Option<Duration>) -> Result<Measurements> {
        let mut boxes: Vec<Option<BoundingBox>> = vec![None; self.pending.len()];

        let collect = async {
            for (slot, (key, rx)) in boxes.iter_mut().zip(self.pending.iter_mut()) {
                let bbox = rx
                    .await
                    .map_err(|_| Error::MeasurementAbandoned(key.to_string()))?;
                *slot = Some(bbox);
            }
            Ok::<(), Error>(())
        };

        let outcome = match timeout {
            Some(limit) => tokio::time::timeout(limit, collect).await,
            None => Ok(collect.await),
        };

        match outcome {
            Ok(result) => result?,
            Err(_) => {
                let mut missing = Vec::new();
                for (slot, (key, rx)) in boxes.iter_mut().zip(self.pending.iter_mut()) {
                    if slot.is_none() {
                        match rx.try_recv() {
                            Ok(bbox) => *slot = Some(bbox),
                            Err(oneshot::error::TryRecvError::Closed) => {
                                return Err(Error::MeasurementAbandoned(key.to_string()));
                            }
                            Err(oneshot::error::TryRecvError::Empty) => {
                                missing.push(key.to_string())
                            }
                        }
                    }
                }
                if !missing.is_empty() {
                    return Err(Error::MeasurementTimeout(missing));
                }
            }
        }

        let boxes = boxes
            .into_iter()
            .collect::<Option<Vec<_>>>()
            .ok_or_else(|| Error::Other("measurement round ended incomplete".to_string()))?;

        tracing::debug!("All {} tab labels measured", boxes.len());
        Ok(Measurements::from_boxes(boxes))
    }
}

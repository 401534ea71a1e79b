//! Station crowding from live user positions.
//!
//! [`CrowdMonitor`] is an explicit observer object: it is created with the
//! stations it watches, fed user position snapshots, and notifies its
//! subscribers whenever the snapshot changes. After [`CrowdMonitor::dispose`]
//! it holds nothing and ignores further updates.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};

use serde::Serialize;

use crate::geo::{distance_km, Coordinate};
use crate::station::Station;
use crate::traits::WaitTimeSource;

#[derive(Debug, Clone)]
pub struct CrowdConfig {
    /// Users within this distance of a station count towards its crowd.
    pub radius_km: f64,
    /// Users silent for longer than this are dropped.
    pub user_timeout_ms: i64,
    pub high_threshold: usize,
    pub critical_threshold: usize,
    /// Expected queueing per user present at a station.
    pub wait_minutes_per_user: u32,
}

impl Default for CrowdConfig {
    fn default() -> Self {
        Self {
            radius_km: 0.5,
            user_timeout_ms: 60 * 1000,
            high_threshold: 2,
            critical_threshold: 5,
            wait_minutes_per_user: 10,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DensityLevel {
    Low,
    High,
    Critical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Trend {
    Stable,
    Increasing,
    Decreasing,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StationCrowdStatus {
    pub station_id: String,
    pub density_level: DensityLevel,
    pub user_count: usize,
    pub trend: Trend,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ActiveUser {
    pub id: String,
    pub coordinate: Coordinate,
    /// Unix epoch milliseconds of the last position report.
    pub last_updated_ms: i64,
}

/// A heatmap sample.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CrowdPoint {
    pub coordinate: Coordinate,
    pub weight: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Arc<dyn Fn() + Send + Sync>;

pub struct CrowdMonitor {
    config: CrowdConfig,
    stations: RwLock<Vec<Station>>,
    users: RwLock<HashMap<String, ActiveUser>>,
    listeners: Mutex<Vec<(SubscriptionId, Listener)>>,
    next_id: AtomicU64,
    disposed: AtomicBool,
}

impl std::fmt::Debug for CrowdMonitor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CrowdMonitor")
            .field("config", &self.config)
            .field("users", &read(&self.users).len())
            .field("listeners", &lock(&self.listeners).len())
            .field("disposed", &self.is_disposed())
            .finish()
    }
}

fn read<T>(lock: &RwLock<T>) -> std::sync::RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

fn write<T>(lock: &RwLock<T>) -> std::sync::RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl CrowdMonitor {
    pub fn new(stations: Vec<Station>, config: CrowdConfig) -> Self {
        Self {
            config,
            stations: RwLock::new(stations),
            users: RwLock::new(HashMap::new()),
            listeners: Mutex::new(Vec::new()),
            next_id: AtomicU64::new(0),
            disposed: AtomicBool::new(false),
        }
    }

    pub fn config(&self) -> &CrowdConfig {
        &self.config
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed.load(Ordering::Acquire)
    }

    /// Records one user's position and drops users idle as of `now_ms`.
    pub fn update_user_location(&self, user_id: &str, coordinate: Coordinate, now_ms: i64) {
        if self.is_disposed() || user_id.is_empty() {
            return;
        }
        {
            let mut users = write(&self.users);
            users.insert(
                user_id.to_string(),
                ActiveUser {
                    id: user_id.to_string(),
                    coordinate,
                    last_updated_ms: now_ms,
                },
            );
            self.retain_active(&mut users, now_ms);
        }
        self.notify();
    }

    /// Replaces the whole active-user set with a fresh snapshot.
    pub fn replace_active_users(&self, snapshot: Vec<ActiveUser>, now_ms: i64) {
        if self.is_disposed() {
            return;
        }
        {
            let mut users = write(&self.users);
            users.clear();
            users.extend(snapshot.into_iter().map(|user| (user.id.clone(), user)));
            self.retain_active(&mut users, now_ms);
            tracing::debug!(active = users.len(), "crowd snapshot replaced");
        }
        self.notify();
    }

    fn retain_active(&self, users: &mut HashMap<String, ActiveUser>, now_ms: i64) {
        let cutoff = now_ms - self.config.user_timeout_ms;
        users.retain(|_, user| user.last_updated_ms >= cutoff);
    }

    pub fn active_user_count(&self) -> usize {
        read(&self.users).len()
    }

    /// Number of active users within the crowd radius of `station`.
    pub fn users_near(&self, station: &Station) -> usize {
        let position = station.coordinate();
        read(&self.users)
            .values()
            .filter(|user| distance_km(user.coordinate, position) <= self.config.radius_km)
            .count()
    }

    fn density_for(&self, count: usize) -> DensityLevel {
        if count >= self.config.critical_threshold {
            DensityLevel::Critical
        } else if count >= self.config.high_threshold {
            DensityLevel::High
        } else {
            DensityLevel::Low
        }
    }

    /// Statuses for monitored stations whose density is above `Low`.
    pub fn station_statuses(&self) -> HashMap<String, StationCrowdStatus> {
        read(&self.stations)
            .iter()
            .filter_map(|station| {
                let user_count = self.users_near(station);
                let density_level = self.density_for(user_count);
                (density_level != DensityLevel::Low).then(|| {
                    (
                        station.id.clone(),
                        StationCrowdStatus {
                            station_id: station.id.clone(),
                            density_level,
                            user_count,
                            // No history is kept.
                            trend: Trend::Stable,
                        },
                    )
                })
            })
            .collect()
    }

    /// One full-weight point per crowded station. Individual users are never exposed.
    pub fn heatmap_points(&self) -> Vec<CrowdPoint> {
        read(&self.stations)
            .iter()
            .filter(|station| self.density_for(self.users_near(station)) != DensityLevel::Low)
            .map(|station| CrowdPoint {
                coordinate: station.coordinate(),
                weight: 1.0,
            })
            .collect()
    }

    pub fn subscribe<F>(&self, callback: F) -> Option<SubscriptionId>
    where
        F: Fn() + Send + Sync + 'static,
    {
        if self.is_disposed() {
            return None;
        }
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        lock(&self.listeners).push((id, Arc::new(callback)));
        Some(id)
    }

    /// Returns false if `id` was not subscribed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut listeners = lock(&self.listeners);
        let before = listeners.len();
        listeners.retain(|(existing, _)| *existing != id);
        listeners.len() != before
    }

    fn notify(&self) {
        // Listeners run outside the lock so they may unsubscribe themselves.
        let listeners: Vec<Listener> = lock(&self.listeners)
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect();
        for listener in listeners {
            listener();
        }
    }

    /// Drops all listeners, users and stations.
    pub fn dispose(&self) {
        if self.disposed.swap(true, Ordering::AcqRel) {
            return;
        }
        lock(&self.listeners).clear();
        write(&self.users).clear();
        write(&self.stations).clear();
        tracing::debug!("crowd monitor disposed");
    }
}

impl WaitTimeSource for CrowdMonitor {
    /// Scales with the number of users present; `None` once disposed.
    fn wait_minutes(&self, station: &Station) -> Option<u32> {
        if self.is_disposed() {
            return None;
        }
        let users = u32::try_from(self.users_near(station)).unwrap_or(u32::MAX);
        Some(users.saturating_mul(self.config.wait_minutes_per_user))
    }
}

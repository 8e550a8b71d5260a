//! The scenario document consumed by the digital twin.

use serde_json::Value;

/// An airport policy zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PolicyZone {
    /// Security screening, perimeter, staff corridors.
    Pz1CriticalSecurity,
    /// Boarding gates.
    Pz2BoardingGates,
    /// Check-in and retail.
    Pz3PublicArea,
    /// VIP lounges.
    Pz4VipRestricted,
    /// Arrivals and baggage reclaim.
    Pz5ArrivalBaggage,
}

impl PolicyZone {
    /// Every zone.
    pub const ALL: [PolicyZone; 5] = [
        PolicyZone::Pz1CriticalSecurity,
        PolicyZone::Pz2BoardingGates,
        PolicyZone::Pz3PublicArea,
        PolicyZone::Pz4VipRestricted,
        PolicyZone::Pz5ArrivalBaggage,
    ];

    /// Camera priority for the zone. Lower is more important.
    pub fn priority(self) -> u8 {
        match self {
            PolicyZone::Pz1CriticalSecurity => 1,
            PolicyZone::Pz2BoardingGates | PolicyZone::Pz4VipRestricted => 2,
            PolicyZone::Pz3PublicArea | PolicyZone::Pz5ArrivalBaggage => 3,
        }
    }

    /// The analytics task run on the zone's video.
    pub fn analytics(self) -> Analytics {
        match self {
            PolicyZone::Pz1CriticalSecurity => Analytics::Intrusion,
            PolicyZone::Pz2BoardingGates => Analytics::PassengerFlow,
            PolicyZone::Pz3PublicArea => Analytics::CrowdAnalytics,
            PolicyZone::Pz4VipRestricted => Analytics::Occupancy,
            PolicyZone::Pz5ArrivalBaggage => Analytics::BaggageTracking,
        }
    }
}

/// A video analytics task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Analytics {
    Intrusion,
    CrowdAnalytics,
    PassengerFlow,
    Occupancy,
    BaggageTracking,
}

impl Analytics {
    /// Nominal compute intensity in `[0, 1]` and processing delay in milliseconds.
    pub fn profile(self) -> (f64, f64) {
        match self {
            Analytics::Intrusion => (0.8, 150.0),
            Analytics::CrowdAnalytics => (0.4, 60.0),
            Analytics::PassengerFlow => (0.5, 80.0),
            Analytics::Occupancy => (0.1, 20.0),
            Analytics::BaggageTracking => (0.6, 90.0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IntentCategory {
    SafetyCritical,
    CrowdMonitoring,
    CostOptimization,
    NetworkQos,
    ContextAware,
    FaultTolerance,
    MultiObjective,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkType {
    Wired,
    Wireless,
    Wan,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureType {
    Shutdown,
    LinkDegradation,
}

/// Weather over the airport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Weather {
    Clear,
    Rain,
    Storm,
}

impl Weather {
    pub const ALL: [Weather; 3] = [Weather::Clear, Weather::Rain, Weather::Storm];
}

/// Time-of-day context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeContext {
    Peak,
    OffPeak,
    Emergency,
}

impl TimeContext {
    pub const ALL: [TimeContext; 3] = [
        TimeContext::Peak,
        TimeContext::OffPeak,
        TimeContext::Emergency,
    ];
}

/// Where analytics for each camera run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Placement {
    /// Each camera picks an edge server or the primary cloud at random.
    Random,
    /// Everything runs on the camera's local edge.
    AllEdge,
    /// Critical-security video stays on the edge; the rest goes to the cloud.
    CriticalEdge,
    /// Everything runs in the primary cloud.
    AllCloud,
}

impl Placement {
    pub const ALL: [Placement; 4] = [
        Placement::Random,
        Placement::AllEdge,
        Placement::CriticalEdge,
        Placement::AllCloud,
    ];
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Camera {
    pub id: String,
    pub zone: PolicyZone,
    pub location: String,
    pub priority: u8,
    pub resolution: String,
    pub fps: u32,
    pub bitrate_mbps: f64,
}

impl Camera {
    /// The terminal part of `location` (`TerminalA/CheckIn` is in `TerminalA`).
    pub fn terminal(&self) -> &str {
        self.location.split('/').next().unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, derive_new::new, serde::Serialize, serde::Deserialize)]
pub struct EdgeServer {
    pub id: String,
    pub location: String,
    pub cpu_cores: u32,
    pub memory_gb: u32,
    pub network_bandwidth_gbps: f64,
}

#[derive(Debug, Clone, PartialEq, derive_new::new, serde::Serialize, serde::Deserialize)]
pub struct CloudEndpoint {
    pub id: String,
    pub location: String,
    pub bandwidth_gbps: u32,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct NetworkLink {
    pub src: String,
    pub dst: String,
    pub capacity_mbps: f64,
    pub latency_ms: f64,
    pub packet_loss_rate: f64,
    pub stochastic: bool,
    pub link_type: LinkType,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct VideoFlow {
    pub id: String,
    pub camera_id: String,
    pub zone: PolicyZone,
    pub source: String,
    pub destination: String,
    pub backup_destination: String,
    pub bitrate_mbps: f64,
    pub priority: u8,
    pub analytics_type: Analytics,
    pub compute_intensity: f64,
    pub processing_delay_ms: f64,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Intent {
    pub id: String,
    pub category: IntentCategory,
    pub description: String,
    pub target_zones: Vec<PolicyZone>,
    pub constraints: Value,
    pub priority: u8,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct FailureEvent {
    pub target: String,
    pub failure_type: FailureType,
    pub start_time_s: u32,
    pub duration_s: u32,
    pub severity: f64,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct BackgroundTraffic {
    pub id: String,
    pub src: String,
    pub dst: String,
    pub start_time_s: u32,
    pub duration_s: u32,
    pub bitrate_mbps: f64,
    pub flow_type: String,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Context {
    pub weather: Weather,
    pub time_of_day: TimeContext,
}

/// A complete scenario.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Scenario {
    pub scenario_id: u32,
    pub context: Context,
    pub cameras: Vec<Camera>,
    pub edge_servers: Vec<EdgeServer>,
    pub cloud_endpoints: Vec<CloudEndpoint>,
    pub network_links: Vec<NetworkLink>,
    pub flows: Vec<VideoFlow>,
    pub background_traffic: Vec<BackgroundTraffic>,
    pub intents: Vec<Intent>,
    pub failures: Vec<FailureEvent>,
}

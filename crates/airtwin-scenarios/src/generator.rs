//! A randomized airport scenario generator.
//!
//! The topology is a star: cameras feed edge servers, edge servers feed a core gateway, and the
//! core gateway reaches the cloud over a shared 1 Gbps WAN uplink, which is the bottleneck.

use log::debug;
use rand::prelude::*;
use serde_json::json;

use crate::model::*;

/// The core gateway aggregates edge traffic toward the cloud. It never runs analytics.
pub const CORE_GATEWAY: &str = "core_gateway";

/// The primary cloud region.
pub const CLOUD_PRIMARY: &str = "cloud_primary";

/// The backup cloud region.
pub const CLOUD_BACKUP: &str = "cloud_backup";

/// Flows whose local edge would otherwise fail over to the cloud fail over here.
pub const EDGE_SECURITY: &str = "edge_security";

/// Background flows originate at these edges.
const TERMINAL_EDGES: [&str; 3] = ["edge_termA", "edge_termB", "edge_termC"];

/// (terminal, area, zone, number of cameras)
const CAMERA_GROUPS: [(&str, &str, PolicyZone, usize); 14] = [
    ("TerminalA", "CheckIn", PolicyZone::Pz3PublicArea, 8),
    ("TerminalA", "Gates_A", PolicyZone::Pz2BoardingGates, 10),
    ("TerminalA", "VIP", PolicyZone::Pz4VipRestricted, 3),
    ("TerminalB", "CheckIn", PolicyZone::Pz3PublicArea, 8),
    ("TerminalB", "Gates_B", PolicyZone::Pz2BoardingGates, 12),
    ("TerminalB", "VIP", PolicyZone::Pz4VipRestricted, 3),
    ("TerminalC", "Gates_C", PolicyZone::Pz2BoardingGates, 8),
    ("TerminalC", "Baggage", PolicyZone::Pz5ArrivalBaggage, 6),
    ("TerminalC", "Arrival", PolicyZone::Pz5ArrivalBaggage, 4),
    ("Security", "Screening", PolicyZone::Pz1CriticalSecurity, 15),
    ("Perimeter", "Fence", PolicyZone::Pz1CriticalSecurity, 20),
    ("Perimeter", "Apron", PolicyZone::Pz1CriticalSecurity, 12),
    ("Staff", "Corridors", PolicyZone::Pz1CriticalSecurity, 8),
    ("Retail", "Shops", PolicyZone::Pz3PublicArea, 10),
];

/// Maps a camera's terminal to the edge server it is wired to.
pub fn edge_for_terminal(terminal: &str) -> &'static str {
    match terminal {
        "TerminalB" => "edge_termB",
        "TerminalC" => "edge_termC",
        "Security" | "Staff" => EDGE_SECURITY,
        "Perimeter" => "edge_perimeter",
        _ => "edge_termA",
    }
}

/// Builds one scenario from a seeded random stream.
#[derive(Debug)]
pub struct ScenarioGenerator {
    rng: StdRng,
    cameras: Vec<Camera>,
    edge_servers: Vec<EdgeServer>,
    cloud_endpoints: Vec<CloudEndpoint>,
    network_links: Vec<NetworkLink>,
    flows: Vec<VideoFlow>,
    intents: Vec<Intent>,
    background_traffic: Vec<BackgroundTraffic>,
    failures: Vec<FailureEvent>,
}

impl ScenarioGenerator {
    /// Creates a generator whose random choices are fully determined by `seed`.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            cameras: Vec::new(),
            edge_servers: Vec::new(),
            cloud_endpoints: Vec::new(),
            network_links: Vec::new(),
            flows: Vec::new(),
            intents: Vec::new(),
            background_traffic: Vec::new(),
            failures: Vec::new(),
        }
    }

    /// Draws a full scenario: topology, weather, intents, flows, background load, and failures.
    pub fn generate(mut self, scenario_id: u32) -> Scenario {
        self.generate_topology();
        let weather = pick(&mut self.rng, &Weather::ALL);
        let time = pick(&mut self.rng, &TimeContext::ALL);
        // Weather changes link properties before anything is placed on them.
        self.apply_weather(weather);
        self.generate_intents(time);
        let placement = pick(&mut self.rng, &Placement::ALL);
        self.generate_flows(placement);
        let nr_background = match time {
            TimeContext::Peak => self.rng.gen_range(60..=100),
            TimeContext::OffPeak | TimeContext::Emergency => self.rng.gen_range(10..=30),
        };
        self.generate_background_traffic(nr_background);
        self.generate_failures();
        debug!("scenario {scenario_id}: {weather:?} weather, {time:?}, {placement:?} placement");
        self.finish(scenario_id, weather)
    }

    pub fn generate_topology(&mut self) {
        self.cameras = CAMERA_GROUPS
            .iter()
            .flat_map(|&(terminal, area, zone, count)| {
                (0..count).map(move |i| camera(terminal, area, zone, i))
            })
            .collect();
        self.edge_servers = vec![
            EdgeServer::new("edge_termA".into(), "Terminal A".into(), 16, 64, 10.0),
            EdgeServer::new("edge_termB".into(), "Terminal B".into(), 16, 64, 10.0),
            EdgeServer::new("edge_termC".into(), "Terminal C".into(), 16, 64, 10.0),
            EdgeServer::new(EDGE_SECURITY.into(), "Security Hub".into(), 32, 128, 25.0),
            EdgeServer::new("edge_perimeter".into(), "Perimeter Control".into(), 16, 64, 10.0),
            EdgeServer::new(CORE_GATEWAY.into(), "Server Room".into(), 64, 128, 100.0),
        ];
        self.cloud_endpoints = vec![
            CloudEndpoint::new(CLOUD_PRIMARY.into(), "Region-1".into(), 100),
            CloudEndpoint::new(CLOUD_BACKUP.into(), "Region-2".into(), 100),
        ];
        self.create_network_links();
    }

    fn create_network_links(&mut self) {
        let mut links = Vec::new();
        // Airport fiber from every edge to the core gateway.
        for edge in self.edge_servers.iter().filter(|e| e.id != CORE_GATEWAY) {
            links.push(link(&edge.id, CORE_GATEWAY, 10_000.0, 1.0, 0.0, LinkType::Wired));
        }
        // The shared WAN uplink.
        links.push(link(CORE_GATEWAY, CLOUD_PRIMARY, 1000.0, 15.0, 0.001, LinkType::Wan));
        links.push(link(CORE_GATEWAY, CLOUD_BACKUP, 1000.0, 25.0, 0.001, LinkType::Wan));
        // Only perimeter cameras are outdoors, on wireless.
        for cam in &self.cameras {
            let edge = edge_for_terminal(cam.terminal());
            let l = if cam.terminal() == "Perimeter" {
                link(&cam.id, edge, 300.0, 8.0, 0.005, LinkType::Wireless)
            } else {
                link(&cam.id, edge, 1000.0, 1.0, 0.0001, LinkType::Wired)
            };
            links.push(l);
        }
        self.network_links = links;
    }

    /// Degrades stochastic links: rain fade on wireless, congestion on the WAN in storms.
    pub fn apply_weather(&mut self, weather: Weather) {
        for link in self.network_links.iter_mut().filter(|l| l.stochastic) {
            match (link.link_type, weather) {
                (LinkType::Wireless, Weather::Rain) => {
                    link.packet_loss_rate = 0.05;
                    link.capacity_mbps *= 0.8;
                }
                (LinkType::Wireless, Weather::Storm) => {
                    link.packet_loss_rate = 0.15;
                    link.capacity_mbps *= 0.6;
                }
                (LinkType::Wan, Weather::Storm) => {
                    link.capacity_mbps *= 0.7;
                    link.latency_ms *= 1.5;
                }
                _ => {}
            }
        }
    }

    pub fn generate_intents(&mut self, time: TimeContext) {
        use IntentCategory::*;
        use PolicyZone::*;

        let all = PolicyZone::ALL.to_vec();
        let mut intents = vec![
            intent(
                "SC1",
                SafetyCritical,
                "Sub-200ms latency for security",
                vec![Pz1CriticalSecurity],
                json!({"max_latency": 200}),
                1,
            ),
            intent(
                "SC2",
                SafetyCritical,
                "Prioritize intrusion detection",
                vec![Pz1CriticalSecurity],
                json!({"priority_boost": true}),
                1,
            ),
            intent(
                "CM1",
                CrowdMonitoring,
                "Optimize check-in density monitoring",
                vec![Pz3PublicArea],
                json!({"min_fps": 15}),
                2,
            ),
            intent(
                "CO1",
                CostOptimization,
                "Minimize cloud egress cost",
                all.clone(),
                json!({"max_cloud_ratio": 0.3}),
                3,
            ),
            intent(
                "NQ1",
                NetworkQos,
                "Limit packet loss < 1%",
                all.clone(),
                json!({"max_loss": 0.01}),
                2,
            ),
            intent(
                "FT1",
                FaultTolerance,
                "Failover to nearest edge",
                all.clone(),
                json!({"failover_enabled": true}),
                1,
            ),
        ];
        match time {
            TimeContext::Peak => intents.push(intent(
                "CA1",
                ContextAware,
                "Peak hour security boost",
                vec![Pz1CriticalSecurity],
                json!({"bw_reservation": "50%"}),
                1,
            )),
            TimeContext::Emergency => intents.push(intent(
                "CA2",
                ContextAware,
                "EMERGENCY: Max reliability",
                all,
                json!({"override_cost": true}),
                1,
            )),
            TimeContext::OffPeak => {}
        }
        self.intents = intents;
    }

    pub fn generate_flows(&mut self, placement: Placement) {
        let candidates = self
            .edge_servers
            .iter()
            .filter(|e| e.id != CORE_GATEWAY)
            .map(|e| e.id.clone())
            .chain(std::iter::once(CLOUD_PRIMARY.to_owned()))
            .collect::<Vec<_>>();
        let mut flows = Vec::with_capacity(self.cameras.len());
        for cam in &self.cameras {
            let local_edge = edge_for_terminal(cam.terminal());
            let destination = match placement {
                Placement::AllEdge => local_edge.to_owned(),
                Placement::AllCloud => CLOUD_PRIMARY.to_owned(),
                Placement::CriticalEdge if cam.zone == PolicyZone::Pz1CriticalSecurity => {
                    local_edge.to_owned()
                }
                Placement::CriticalEdge => CLOUD_PRIMARY.to_owned(),
                Placement::Random => candidates.choose(&mut self.rng).cloned().unwrap_or_default(),
            };
            let backup_destination = if destination == CLOUD_PRIMARY {
                EDGE_SECURITY
            } else {
                CLOUD_PRIMARY
            };
            let analytics = cam.zone.analytics();
            let (intensity, delay) = analytics.profile();
            let jitter = self.rng.gen_range(0.9..=1.1);
            flows.push(VideoFlow {
                id: format!("flow_{}", cam.id),
                camera_id: cam.id.clone(),
                zone: cam.zone,
                source: cam.id.clone(),
                destination,
                backup_destination: backup_destination.to_owned(),
                bitrate_mbps: cam.bitrate_mbps,
                priority: cam.priority,
                analytics_type: analytics,
                compute_intensity: f64::min(1.0, intensity * jitter),
                processing_delay_ms: delay,
            });
        }
        self.flows = flows;
    }

    pub fn generate_background_traffic(&mut self, nr_flows: usize) {
        self.background_traffic = (0..nr_flows)
            .map(|i| BackgroundTraffic {
                id: format!("bg_{i}"),
                src: pick(&mut self.rng, &TERMINAL_EDGES).to_string(),
                dst: CLOUD_PRIMARY.into(),
                start_time_s: self.rng.gen_range(0..=600),
                duration_s: self.rng.gen_range(30..=300),
                bitrate_mbps: self.rng.gen_range(5.0..20.0),
                flow_type: "TCP".into(),
            })
            .collect();
    }

    /// Rolls for one of: a single edge shutdown, WAN degradation, a double shutdown, or nothing.
    pub fn generate_failures(&mut self) {
        let targets = self
            .edge_servers
            .iter()
            .filter(|e| e.id != CORE_GATEWAY)
            .map(|e| e.id.clone())
            .collect::<Vec<_>>();
        let roll: f64 = self.rng.gen();
        let mut failures = Vec::new();
        if roll > 0.85 {
            if let Some(edge) = targets.choose(&mut self.rng) {
                let start = self.rng.gen_range(100..=400);
                failures.push(failure(edge, FailureType::Shutdown, start, 120, 1.0));
            }
        } else if roll > 0.70 {
            let start = self.rng.gen_range(50..=300);
            let target = format!("{CORE_GATEWAY}_{CLOUD_PRIMARY}");
            failures.push(failure(&target, FailureType::LinkDegradation, start, 200, 0.2));
        } else if roll > 0.65 && targets.len() >= 2 {
            failures.push(failure(&targets[0], FailureType::Shutdown, 100, 60, 1.0));
            let last = &targets[targets.len() - 1];
            failures.push(failure(last, FailureType::Shutdown, 120, 60, 1.0));
        }
        for f in &failures {
            debug!("failure event: {} {:?} at {}s", f.target, f.failure_type, f.start_time_s);
        }
        self.failures = failures;
    }

    fn finish(self, scenario_id: u32, weather: Weather) -> Scenario {
        let time_of_day = if self.background_traffic.len() > 50 {
            TimeContext::Peak
        } else {
            TimeContext::OffPeak
        };
        Scenario {
            scenario_id,
            context: Context {
                weather,
                time_of_day,
            },
            cameras: self.cameras,
            edge_servers: self.edge_servers,
            cloud_endpoints: self.cloud_endpoints,
            network_links: self.network_links,
            flows: self.flows,
            background_traffic: self.background_traffic,
            intents: self.intents,
            failures: self.failures,
        }
    }
}

/// Picks uniformly from a fixed, non-empty table.
fn pick<T: Copy, const N: usize>(rng: &mut impl Rng, table: &[T; N]) -> T {
    table[rng.gen_range(0..N)]
}

fn camera(terminal: &str, area: &str, zone: PolicyZone, i: usize) -> Camera {
    let (resolution, fps, bitrate_mbps) = match zone {
        PolicyZone::Pz1CriticalSecurity => ("4K", 30, 25.0),
        PolicyZone::Pz2BoardingGates | PolicyZone::Pz4VipRestricted => ("1080p", 30, 8.0),
        PolicyZone::Pz3PublicArea | PolicyZone::Pz5ArrivalBaggage => ("1080p", 25, 6.0),
    };
    Camera {
        id: format!("cam_{terminal}_{area}_{i:02}"),
        zone,
        location: format!("{terminal}/{area}"),
        priority: zone.priority(),
        resolution: resolution.into(),
        fps,
        bitrate_mbps,
    }
}

fn link(
    src: &str,
    dst: &str,
    capacity_mbps: f64,
    latency_ms: f64,
    loss: f64,
    link_type: LinkType,
) -> NetworkLink {
    NetworkLink {
        src: src.into(),
        dst: dst.into(),
        capacity_mbps,
        latency_ms,
        packet_loss_rate: loss,
        stochastic: !matches!(link_type, LinkType::Wired),
        link_type,
    }
}

fn intent(
    id: &str,
    category: IntentCategory,
    description: &str,
    target_zones: Vec<PolicyZone>,
    constraints: serde_json::Value,
    priority: u8,
) -> Intent {
    Intent {
        id: id.into(),
        category,
        description: description.into(),
        target_zones,
        constraints,
        priority,
    }
}

fn failure(
    target: &str,
    failure_type: FailureType,
    start_time_s: u32,
    duration_s: u32,
    severity: f64,
) -> FailureEvent {
    FailureEvent {
        target: target.into(),
        failure_type,
        start_time_s,
        duration_s,
        severity,
    }
}

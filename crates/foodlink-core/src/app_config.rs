#[derive(Clone)]
pub struct AppConfig {
    pub supabase_url: String,
    pub supabase_key: String,
    pub stores_table: String,
    pub log_level: String,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    pub drive_minutes: u32,
    pub average_speed_kmh: f64,
    pub nearest_limit: usize,
    pub nearby_radius_miles: f64,
    pub cluster_radius: f64,
    pub cluster_max_zoom: u8,
    /// Fallback user position when none is given on the command line.
    pub user_latitude: Option<f64>,
    pub user_longitude: Option<f64>,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("supabase_url", &self.supabase_url)
            .field("supabase_key", &"[redacted]")
            .field("stores_table", &self.stores_table)
            .field("log_level", &self.log_level)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("drive_minutes", &self.drive_minutes)
            .field("average_speed_kmh", &self.average_speed_kmh)
            .field("nearest_limit", &self.nearest_limit)
            .field("nearby_radius_miles", &self.nearby_radius_miles)
            .field("cluster_radius", &self.cluster_radius)
            .field("cluster_max_zoom", &self.cluster_max_zoom)
            .field(
                "user_location",
                &self.user_latitude.zip(self.user_longitude).map(|_| "[redacted]"),
            )
            .finish()
    }
}

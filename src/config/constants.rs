// src/config/constants.rs
//! System-wide constants for signal simulation, acquisition and analysis.
//! Every tunable number lives here so the models stay free of magic values.

/// Signal source constants, grouped by modality
pub mod signal {
    /// Analog DAQ sampling rate
    pub const ANALOG_SAMPLING_RATE_HZ: u32 = 1000;
    /// Digital I/O sampling rate
    pub const DIGITAL_SAMPLING_RATE_HZ: u32 = 1000;
    /// Networked instrument sampling rate
    pub const ETHERNET_SAMPLING_RATE_HZ: u32 = 10;

    pub const DEFAULT_CHANNEL_COUNT: usize = 1;
    pub const MIN_CHANNEL_COUNT: usize = 1;
    pub const MAX_CHANNEL_COUNT: usize = 64;

    /// Upper bound on a single acquisition, keeps a run from allocating without limit
    pub const MAX_DURATION_SECS: f64 = 86_400.0;

    // Analog model: one full sinusoid over the run, gaussian noise, linear drift
    pub const ANALOG_AMPLITUDE: f64 = 5.0;
    pub const ANALOG_NOISE_SIGMA: f64 = 0.1;
    pub const ANALOG_DRIFT_END: f64 = 0.5;

    // Digital model: contact bounce suppression window after each transition
    pub const DEBOUNCE_WINDOW_SAMPLES: usize = 4;

    // Ethernet model: gaussian base, slow periodic variation, measurement noise
    pub const ETHERNET_BASE_MEAN: f64 = 0.5;
    pub const ETHERNET_BASE_SIGMA: f64 = 0.1;
    pub const ETHERNET_PERIODIC_AMPLITUDE: f64 = 0.05;
    pub const ETHERNET_PERIODIC_FREQUENCY_HZ: f64 = 0.1;
    pub const ETHERNET_NOISE_SIGMA: f64 = 0.01;
}

/// Acquisition session constants
pub mod acquisition {
    pub const DEFAULT_CONNECT_DELAY_MS: u64 = 500;
    pub const DEFAULT_DISCONNECT_DELAY_MS: u64 = 200;
    pub const DEFAULT_NETWORK_LATENCY_MS: u64 = 50;
    pub const DEFAULT_PACKET_LOSS_RATE: f64 = 0.01;
    pub const DEFAULT_CONNECT_FAILURE_RATE: f64 = 0.05;

    /// Ceiling for any configured simulated delay
    pub const MAX_SIMULATED_DELAY_MS: u64 = 10_000;
    /// TOML integers are signed 64-bit, so larger seeds cannot be written or overridden
    pub const MAX_SEED: u64 = i64::MAX as u64;
}

/// Statistics engine constants
pub mod analysis {
    /// Control limits sit this many standard deviations from the center line
    pub const DEFAULT_CONTROL_SIGMA: f64 = 3.0;
    /// Capability indices divide the spec margin by this many sigmas
    pub const CAPABILITY_SIGMA: f64 = 3.0;
}

/// Per-test scaling factors, specification limits and model parameters
pub mod profiles {
    pub mod isolation {
        /// raw -> MΩ
        pub const RESISTANCE_SCALE: f64 = 1e6;
        /// raw -> V
        pub const VOLTAGE_SCALE: f64 = 1000.0;
        pub const MIN_RESISTANCE_MOHM: f64 = 100.0;
    }

    pub mod parametric {
        /// raw -> mV
        pub const VOLTAGE_SCALE: f64 = 1000.0;
        /// raw -> mA
        pub const CURRENT_SCALE: f64 = 1000.0;
        pub const VOLTAGE_MIN_MV: f64 = 3200.0;
        pub const VOLTAGE_MAX_MV: f64 = 3400.0;
        pub const CURRENT_MIN_MA: f64 = 450.0;
        pub const CURRENT_MAX_MA: f64 = 550.0;
        pub const POWER_MAX_MW: f64 = 2000.0;
    }

    pub mod hipot {
        /// raw -> kV
        pub const VOLTAGE_SCALE: f64 = 5.0;
        /// raw -> mA
        pub const CURRENT_SCALE: f64 = 1.0;
        pub const VOLTAGE_MIN_KV: f64 = 4.5;
        pub const VOLTAGE_MAX_KV: f64 = 5.5;
        pub const LEAKAGE_LIMIT_MA: f64 = 1.0;
    }

    pub mod burnin {
        pub const MAX_TEMPERATURE: f64 = 90.0;
        pub const SUPPLY_VOLTAGE_MEAN: f64 = 3.3;
        pub const SUPPLY_VOLTAGE_SIGMA: f64 = 0.1;
        pub const SUPPLY_VOLTAGE_MIN: f64 = 3.0;
        pub const SUPPLY_VOLTAGE_MAX: f64 = 3.6;
        pub const SUPPLY_CURRENT_MEAN: f64 = 0.5;
        pub const SUPPLY_CURRENT_SIGMA: f64 = 0.05;
        pub const SUPPLY_CURRENT_MIN: f64 = 0.3;
        pub const SUPPLY_CURRENT_MAX: f64 = 0.7;
    }

    pub mod laser {
        pub const POWER_GAIN: f64 = 50.0;
        pub const POWER_OFFSET_MW: f64 = 55.0;
        pub const WAVELENGTH_GAIN: f64 = 25.0;
        pub const WAVELENGTH_OFFSET_NM: f64 = 825.0;
        pub const POWER_MIN_MW: f64 = 10.0;
        pub const POWER_MAX_MW: f64 = 100.0;
        pub const WAVELENGTH_MIN_NM: f64 = 800.0;
        pub const WAVELENGTH_MAX_NM: f64 = 850.0;
    }

    pub mod ict {
        pub const CONTINUITY_POINTS: [&str; 5] = ["TP1", "TP2", "TP3", "TP4", "TP5"];
        pub const CONTINUITY_MEAN_OHM: f64 = 0.5;
        pub const CONTINUITY_SIGMA_OHM: f64 = 0.1;
        pub const CONTINUITY_LIMIT_OHM: f64 = 1.0;

        pub const RESISTOR_POINTS: [&str; 4] = ["R1", "R2", "R3", "R4"];
        pub const RESISTOR_NOMINAL_OHM: f64 = 1000.0;
        pub const RESISTOR_SIGMA_OHM: f64 = 50.0;
        pub const RESISTOR_TOLERANCE: f64 = 0.05;

        pub const CAPACITOR_POINTS: [&str; 3] = ["C1", "C2", "C3"];
        pub const CAPACITOR_NOMINAL_UF: f64 = 10.0;
        pub const CAPACITOR_SIGMA_UF: f64 = 0.5;
        pub const CAPACITOR_TOLERANCE: f64 = 0.10;

        pub const POWER_POINTS: [&str; 2] = ["VCC", "GND"];
        pub const POWER_NOMINAL_V: f64 = 3.3;
        /// Rail noise as a fraction of nominal
        pub const POWER_SIGMA_FRACTION: f64 = 0.01;
        pub const POWER_TOLERANCE: f64 = 0.05;
    }
}

/// Timing helpers
pub mod timing {
    pub const NANOSECONDS_PER_SECOND: u64 = 1_000_000_000;
    pub const NANOSECONDS_PER_MILLISECOND: u64 = 1_000_000;
}

/// Environment and file discovery for configuration
pub mod paths {
    pub const CONFIG_ENV_PREFIX: &str = "TESTBENCH";
    pub const DEFAULT_CONFIG_FILE: &str = "testbench.toml";
}

pub const G0: f64 = 9.81; // Standard gravitational acceleration (m/s²)
pub const SEA_LEVEL_DENSITY: f64 = 1.225; // Air density at sea level (kg/m³)

// Air-breathing propulsion
pub const OXYGEN_MASS_FRACTION: f64 = 0.21; // Share of intake air available as oxidiser
pub const METHANE_TO_OXYGEN_RATIO: f64 = 0.25; // Fuel mass per unit oxygen for complete combustion
pub const RAMJET_SPECIFIC_IMPULSE: f64 = 3200.0; // s
pub const SPECIFIC_FUEL_CONSUMPTION: f64 = 0.5; // Thrust-specific fuel consumption of the TSFC model

// Energy-flux thrust heuristic
pub const CAPTURE_FRACTION: f64 = 0.2;
pub const FUEL_ENERGY_DENSITY: f64 = 5.0e7; // J/kg
pub const COMBUSTION_EFFICIENCY: f64 = 0.7;
pub const EXHAUST_FACTOR: f64 = 300.0;

// Lifting-body geometry
pub const FRONTAL_RADIUS_DIVISOR: f64 = 4.5; // Frontal radius is lifting area / 4.5

// Math
pub const PI: f64 = std::f64::consts::PI;

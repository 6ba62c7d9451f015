use crate::errors::ConfigError;
use csv::ReaderBuilder;
use lazy_static::lazy_static;
use std::io::Read;
use std::path::Path;

const REFERENCE_ALTITUDES: [f64; 22] = [
    -1000.0, 0.0, 1000.0, 2000.0, 3000.0, 4000.0, 5000.0, 6000.0, 7000.0, 8000.0, 9000.0, 10000.0,
    15000.0, 20000.0, 25000.0, 30000.0, 40000.0, 50000.0, 60000.0, 70000.0, 80000.0, 90000.0,
];

const REFERENCE_DENSITIES: [f64; 22] = [
    1.347, 1.225, 1.112, 1.007, 0.9093, 0.8194, 0.7364, 0.6601, 0.5900, 0.5258, 0.4671, 0.4135,
    0.1948, 0.08891, 0.04008, 0.01841, 0.003996, 0.001027, 0.0003097, 0.00008283, 0.00001846, 0.0,
];

lazy_static! {
    static ref REFERENCE_TABLE: AtmosphereTable = AtmosphereTable {
        altitudes: REFERENCE_ALTITUDES.to_vec(),
        densities: REFERENCE_DENSITIES.to_vec(),
    };
}

/// Altitude (m) to air density (kg/m³) lookup.
///
/// Between rows the density is interpolated linearly. Outside the table the
/// nearest endpoint is used, so a table ending in 0.0 gives vacuum above its
/// last altitude.
#[derive(Debug, Clone, PartialEq)]
pub struct AtmosphereTable {
    altitudes: Vec<f64>,
    densities: Vec<f64>,
}

impl AtmosphereTable {
    pub fn new(samples: Vec<(f64, f64)>) -> Result<Self, ConfigError> {
        if samples.is_empty() {
            return Err(ConfigError::EmptyAtmosphereTable);
        }

        let mut altitudes = Vec::with_capacity(samples.len());
        let mut densities = Vec::with_capacity(samples.len());

        for (row, (altitude, density)) in samples.into_iter().enumerate() {
            if !altitude.is_finite() {
                return Err(ConfigError::UnsortedAtmosphereTable { row });
            }
            if let Some(&previous) = altitudes.last() {
                if altitude <= previous {
                    return Err(ConfigError::UnsortedAtmosphereTable { row });
                }
            }
            if !density.is_finite() || density < 0.0 {
                return Err(ConfigError::InvalidDensity { row });
            }
            altitudes.push(altitude);
            densities.push(density);
        }

        Ok(Self {
            altitudes,
            densities,
        })
    }

    /// Standard table shipped with the crate, sea level at 1.225 kg/m³.
    pub fn reference() -> &'static AtmosphereTable {
        &REFERENCE_TABLE
    }

    /// Reads a two-column `altitude,density` CSV with a header row.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, ConfigError> {
        let mut rdr = ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);
        let mut samples = Vec::new();

        for (row, result) in rdr.records().enumerate() {
            let record = result?;
            if record.len() < 2 {
                return Err(ConfigError::invalid(
                    "atmosphere_table",
                    format!("row {} has {} columns, expected 2", row, record.len()),
                ));
            }
            let parse = |value: &str| {
                value.parse::<f64>().map_err(|e| {
                    ConfigError::invalid("atmosphere_table", format!("row {}: {}", row, e))
                })
            };
            samples.push((parse(&record[0])?, parse(&record[1])?));
        }

        Self::new(samples)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn len(&self) -> usize {
        self.altitudes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.altitudes.is_empty()
    }

    pub fn altitude_range(&self) -> (f64, f64) {
        (self.altitudes[0], self.altitudes[self.altitudes.len() - 1])
    }

    pub fn rows(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.altitudes
            .iter()
            .copied()
            .zip(self.densities.iter().copied())
    }

    pub fn density(&self, altitude: f64) -> f64 {
        let last = self.altitudes.len() - 1;
        if !(altitude > self.altitudes[0]) {
            return self.densities[0];
        }
        if altitude >= self.altitudes[last] {
            return self.densities[last];
        }

        // First row at or above the query; always in 1..=last here
        let upper = self.altitudes.partition_point(|&a| a < altitude);
        if self.altitudes[upper] == altitude {
            return self.densities[upper];
        }

        let lower = upper - 1;
        let (a0, a1) = (self.altitudes[lower], self.altitudes[upper]);
        let (d0, d1) = (self.densities[lower], self.densities[upper]);
        let fraction = (altitude - a0) / (a1 - a0);

        (d0 + (d1 - d0) * fraction).max(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use test_case::test_case;

    #[test_case(0.0, 1.225; "sea level")]
    #[test_case(500.0, 1.1685; "between rows")]
    #[test_case(12500.0, 0.30415; "wide row gap")]
    #[test_case(-5000.0, 1.347; "clamped below table")]
    #[test_case(120000.0, 0.0; "clamped above table")]
    fn reference_density(altitude: f64, expected: f64) {
        let rho = AtmosphereTable::reference().density(altitude);
        assert_abs_diff_eq!(rho, expected, epsilon = 1e-9);
    }

    #[test]
    fn reference_table_matches_sea_level_constant() {
        assert_eq!(AtmosphereTable::reference().density(0.0), crate::constants::SEA_LEVEL_DENSITY);
    }

    #[test]
    fn table_entries_are_returned_exactly() {
        let table = AtmosphereTable::reference();
        for (altitude, density) in table.rows() {
            assert_eq!(table.density(altitude), density);
        }
    }

    #[test]
    fn reference_density_never_increases_with_altitude() {
        let table = AtmosphereTable::reference();
        let mut previous = f64::INFINITY;
        for step in 0..=2000 {
            let altitude = -2000.0 + step as f64 * 50.0;
            let rho = table.density(altitude);
            assert!(rho <= previous, "density rose at {} m", altitude);
            assert!(rho >= 0.0);
            previous = rho;
        }
    }

    #[test]
    fn empty_table_is_rejected() {
        assert!(matches!(
            AtmosphereTable::new(vec![]),
            Err(ConfigError::EmptyAtmosphereTable)
        ));
    }

    #[test_case(vec![(0.0, 1.0), (0.0, 0.5)], 1; "repeated altitude")]
    #[test_case(vec![(0.0, 1.0), (1000.0, 0.5), (500.0, 0.7)], 2; "descending altitude")]
    fn unsorted_table_is_rejected(samples: Vec<(f64, f64)>, bad_row: usize) {
        match AtmosphereTable::new(samples) {
            Err(ConfigError::UnsortedAtmosphereTable { row }) => assert_eq!(row, bad_row),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn negative_density_is_rejected() {
        assert!(matches!(
            AtmosphereTable::new(vec![(0.0, 1.0), (1000.0, -0.1)]),
            Err(ConfigError::InvalidDensity { row: 1 })
        ));
    }

    #[test]
    fn single_row_table_is_constant() {
        let table = AtmosphereTable::new(vec![(0.0, 0.8)]).unwrap();
        assert_eq!(table.density(-100.0), 0.8);
        assert_eq!(table.density(0.0), 0.8);
        assert_eq!(table.density(1.0e5), 0.8);
    }

    #[test]
    fn table_loads_from_csv() {
        let data = "altitude,density\n0, 1.2\n1000, 1.0\n2000, 0.9\n";
        let table = AtmosphereTable::from_reader(data.as_bytes()).unwrap();
        assert_eq!(table.len(), 3);
        assert_eq!(table.altitude_range(), (0.0, 2000.0));
        assert_abs_diff_eq!(table.density(1500.0), 0.95, epsilon = 1e-12);
    }

    #[test]
    fn csv_with_text_density_is_rejected() {
        let data = "altitude,density\n0,thick\n";
        assert!(matches!(
            AtmosphereTable::from_reader(data.as_bytes()),
            Err(ConfigError::InvalidField { field: "atmosphere_table", .. })
        ));
    }
}

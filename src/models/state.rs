use nalgebra as na;

/// Planar kinematic state of the vehicle.
///
/// `velocity` and `position` are (horizontal, vertical) pairs in m/s and m.
/// `propellant_consumed` accumulates fuel burnt since the start of the run (kg),
/// so the current mass is always derived from the initial mass rather than
/// decremented in place.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KinematicState {
    pub velocity: na::Vector2<f64>,
    pub position: na::Vector2<f64>,
    pub propellant_consumed: f64,
}

impl KinematicState {
    pub fn new(velocity: na::Vector2<f64>, position: na::Vector2<f64>) -> Self {
        KinematicState {
            velocity,
            position,
            propellant_consumed: 0.0,
        }
    }

    /// Resolves a speed along the angle of attack (degrees) into velocity components.
    pub fn from_launch(speed: f64, angle_of_attack_deg: f64, downrange: f64, altitude: f64) -> Self {
        let theta = angle_of_attack_deg.to_radians();
        Self::new(
            na::Vector2::new(speed * theta.cos(), speed * theta.sin()),
            na::Vector2::new(downrange, altitude),
        )
    }

    pub fn zero() -> Self {
        Self::new(na::Vector2::zeros(), na::Vector2::zeros())
    }

    pub fn horizontal_velocity(&self) -> f64 {
        self.velocity.x
    }

    pub fn vertical_velocity(&self) -> f64 {
        self.velocity.y
    }

    pub fn downrange(&self) -> f64 {
        self.position.x
    }

    pub fn altitude(&self) -> f64 {
        self.position.y
    }

    pub fn speed(&self) -> f64 {
        self.velocity.magnitude()
    }

    pub fn components(&self) -> [f64; 5] {
        [
            self.velocity.x,
            self.velocity.y,
            self.position.x,
            self.position.y,
            self.propellant_consumed,
        ]
    }

    pub fn is_finite(&self) -> bool {
        self.components().iter().all(|c| c.is_finite())
    }
}

impl std::ops::Add for KinematicState {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        KinematicState {
            velocity: self.velocity + other.velocity,
            position: self.position + other.position,
            propellant_consumed: self.propellant_consumed + other.propellant_consumed,
        }
    }
}

impl std::ops::Sub for KinematicState {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        KinematicState {
            velocity: self.velocity - other.velocity,
            position: self.position - other.position,
            propellant_consumed: self.propellant_consumed - other.propellant_consumed,
        }
    }
}

impl std::ops::Mul<f64> for KinematicState {
    type Output = Self;

    fn mul(self, scalar: f64) -> Self {
        KinematicState {
            velocity: self.velocity * scalar,
            position: self.position * scalar,
            propellant_consumed: self.propellant_consumed * scalar,
        }
    }
}

#![forbid(unsafe_code)]

//! Static table of data-pack vehicle property identifiers.
//!
//! The numeric ids overlap between vehicle classes, so a property is only
//! meaningful together with its [`VehicleClass`]. The table is read-only
//! lookup data; the formatter only uses it to scale raw speed values into
//! the km-ish/h unit that `{VELOCITY}` expects.

/// Broad vehicle category a property belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VehicleClass {
    Any,
    Train,
    RoadVehicle,
    Ship,
    Aircraft,
}

macro_rules! vehicle_properties {
    ($($name:ident = ($class:ident, $id:literal),)*) => {
        /// A known vehicle property.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum VehicleProperty {
            $($name,)*
        }

        impl VehicleProperty {
            /// Every known property.
            pub const ALL: &'static [Self] = &[$(Self::$name,)*];

            /// Vehicle class the id belongs to.
            #[must_use]
            pub const fn class(self) -> VehicleClass {
                match self {
                    $(Self::$name => VehicleClass::$class,)*
                }
            }

            /// Raw property id within its class.
            #[must_use]
            pub const fn id(self) -> u8 {
                match self {
                    $(Self::$name => $id,)*
                }
            }
        }
    };
}

vehicle_properties! {
    LoadAmount = (Any, 0x07),
    TrainSpeed = (Train, 0x09),
    TrainPower = (Train, 0x0B),
    TrainRunningCostFactor = (Train, 0x0D),
    TrainCargoCapacity = (Train, 0x14),
    TrainWeight = (Train, 0x16),
    TrainCostFactor = (Train, 0x17),
    TrainTractiveEffort = (Train, 0x1F),
    TrainShortenFactor = (Train, 0x21),
    TrainUserData = (Train, 0x25),
    TrainCargoAgePeriod = (Train, 0x2B),
    RoadVehicleRunningCostFactor = (RoadVehicle, 0x09),
    RoadVehicleCargoCapacity = (RoadVehicle, 0x0F),
    RoadVehicleCostFactor = (RoadVehicle, 0x11),
    RoadVehiclePower = (RoadVehicle, 0x13),
    RoadVehicleWeight = (RoadVehicle, 0x14),
    RoadVehicleSpeed = (RoadVehicle, 0x15),
    RoadVehicleTractiveEffort = (RoadVehicle, 0x18),
    RoadVehicleCargoAgePeriod = (RoadVehicle, 0x22),
    RoadVehicleShortenFactor = (RoadVehicle, 0x23),
    ShipCostFactor = (Ship, 0x0A),
    ShipSpeed = (Ship, 0x0B),
    ShipCargoCapacity = (Ship, 0x0D),
    ShipRunningCostFactor = (Ship, 0x0F),
    ShipCargoAgePeriod = (Ship, 0x1D),
    AircraftCostFactor = (Aircraft, 0x0B),
    AircraftSpeed = (Aircraft, 0x0C),
    AircraftRunningCostFactor = (Aircraft, 0x0E),
    AircraftPassengerCapacity = (Aircraft, 0x0F),
    AircraftMailCapacity = (Aircraft, 0x11),
    AircraftCargoAgePeriod = (Aircraft, 0x1C),
    AircraftRange = (Aircraft, 0x1F),
}

impl VehicleProperty {
    /// Find a property by class and raw id. Class-independent properties
    /// match any class.
    #[must_use]
    pub fn lookup(class: VehicleClass, id: u8) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|p| p.id() == id && (p.class() == class || p.class() == VehicleClass::Any))
    }

    /// Whether this is a maximum-speed property.
    #[must_use]
    pub const fn is_speed(self) -> bool {
        matches!(
            self,
            Self::TrainSpeed | Self::RoadVehicleSpeed | Self::ShipSpeed | Self::AircraftSpeed
        )
    }

    /// Convert a raw speed value into km-ish/h, rounding half away from
    /// zero. `None` for non-speed properties.
    ///
    /// One raw unit is 1 km-ish/h for trains, 2 for road vehicles, 0.5 for
    /// ships and 12.8 for aircraft.
    #[must_use]
    pub fn speed_to_kmish(self, raw: i64) -> Option<i64> {
        let (num, den) = match self {
            Self::TrainSpeed => (1, 1),
            Self::RoadVehicleSpeed => (2, 1),
            Self::ShipSpeed => (1, 2),
            Self::AircraftSpeed => (64, 5),
            _ => return None,
        };
        let scaled = i128::from(raw) * num;
        let half = den / 2;
        let rounded = if scaled >= 0 {
            (scaled + half) / den
        } else {
            (scaled - half) / den
        };
        i64::try_from(rounded).ok()
    }
}

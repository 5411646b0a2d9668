//! Shipped memory-bank descriptors: bank 0 (identification, mandatory),
//! bank 1 (OEM, DiiA Part 251), banks 202-204 (energy/power, DiiA Part 252),
//! bank 205 (control-gear diagnostics) and bank 207 (luminaire maintenance,
//! DiiA Part 253). A representative, extensible subset, not an exhaustive
//! transcription of every defined value.

use super::{MemoryBankDescriptor, MemoryLocation, MemoryType, MemoryValueDescriptor, MemoryValueKind};

const fn loc(address: u8, memory_type: MemoryType) -> MemoryLocation {
    MemoryLocation { address, memory_type }
}

pub static BANK_0: MemoryBankDescriptor = MemoryBankDescriptor {
    number: 0,
    last_address: 0x1a,
    lock_byte: None,
    latch_byte: None,
    values: &[
        MemoryValueDescriptor {
            name: "gtin",
            locations: &[
                loc(0x03, MemoryType::NvmRo),
                loc(0x04, MemoryType::NvmRo),
                loc(0x05, MemoryType::NvmRo),
                loc(0x06, MemoryType::NvmRo),
                loc(0x07, MemoryType::NvmRo),
                loc(0x08, MemoryType::NvmRo),
            ],
            kind: MemoryValueKind::Numeric,
        },
        MemoryValueDescriptor {
            name: "firmware_version",
            locations: &[loc(0x09, MemoryType::NvmRo), loc(0x0a, MemoryType::NvmRo)],
            kind: MemoryValueKind::VersionNumber,
        },
        MemoryValueDescriptor {
            name: "identification_number",
            locations: &[
                loc(0x0b, MemoryType::NvmRo),
                loc(0x0c, MemoryType::NvmRo),
                loc(0x0d, MemoryType::NvmRo),
                loc(0x0e, MemoryType::NvmRo),
                loc(0x0f, MemoryType::NvmRo),
                loc(0x10, MemoryType::NvmRo),
                loc(0x11, MemoryType::NvmRo),
                loc(0x12, MemoryType::NvmRo),
            ],
            kind: MemoryValueKind::ManufacturerSpecific,
        },
        MemoryValueDescriptor {
            name: "hardware_version",
            locations: &[loc(0x13, MemoryType::NvmRo), loc(0x14, MemoryType::NvmRo)],
            kind: MemoryValueKind::VersionNumber,
        },
        MemoryValueDescriptor {
            name: "part_101_version",
            locations: &[loc(0x15, MemoryType::NvmRo)],
            kind: MemoryValueKind::Numeric,
        },
        MemoryValueDescriptor {
            name: "part_102_version",
            locations: &[loc(0x16, MemoryType::NvmRo)],
            kind: MemoryValueKind::Numeric,
        },
        MemoryValueDescriptor {
            name: "part_103_version",
            locations: &[loc(0x17, MemoryType::NvmRo)],
            kind: MemoryValueKind::Numeric,
        },
        MemoryValueDescriptor {
            name: "device_unit_count",
            locations: &[loc(0x18, MemoryType::NvmRo)],
            kind: MemoryValueKind::Numeric,
        },
        MemoryValueDescriptor {
            name: "gear_unit_count",
            locations: &[loc(0x19, MemoryType::NvmRo)],
            kind: MemoryValueKind::Numeric,
        },
        MemoryValueDescriptor {
            name: "unit_index",
            locations: &[loc(0x1a, MemoryType::NvmRo)],
            kind: MemoryValueKind::Numeric,
        },
    ],
};

pub static BANK_1: MemoryBankDescriptor = MemoryBankDescriptor {
    number: 1,
    last_address: 0x22,
    lock_byte: Some(0x02),
    latch_byte: None,
    values: &[
        MemoryValueDescriptor {
            name: "manufacturer_gtin",
            locations: &[
                loc(0x03, MemoryType::NvmRwProtectable),
                loc(0x04, MemoryType::NvmRwProtectable),
                loc(0x05, MemoryType::NvmRwProtectable),
                loc(0x06, MemoryType::NvmRwProtectable),
                loc(0x07, MemoryType::NvmRwProtectable),
                loc(0x08, MemoryType::NvmRwProtectable),
            ],
            kind: MemoryValueKind::ManufacturerSpecific,
        },
        MemoryValueDescriptor {
            name: "luminaire_id",
            locations: &[
                loc(0x09, MemoryType::NvmRwProtectable),
                loc(0x0a, MemoryType::NvmRwProtectable),
                loc(0x0b, MemoryType::NvmRwProtectable),
                loc(0x0c, MemoryType::NvmRwProtectable),
                loc(0x0d, MemoryType::NvmRwProtectable),
                loc(0x0e, MemoryType::NvmRwProtectable),
                loc(0x0f, MemoryType::NvmRwProtectable),
                loc(0x10, MemoryType::NvmRwProtectable),
            ],
            kind: MemoryValueKind::ManufacturerSpecific,
        },
        MemoryValueDescriptor {
            name: "content_format_id",
            locations: &[loc(0x11, MemoryType::NvmRwProtectable), loc(0x12, MemoryType::NvmRwProtectable)],
            kind: MemoryValueKind::Numeric,
        },
        MemoryValueDescriptor {
            name: "year_of_manufacture",
            locations: &[loc(0x13, MemoryType::NvmRwProtectable)],
            kind: MemoryValueKind::Numeric,
        },
        MemoryValueDescriptor {
            name: "week_of_manufacture",
            locations: &[loc(0x14, MemoryType::NvmRwProtectable)],
            kind: MemoryValueKind::Numeric,
        },
        MemoryValueDescriptor {
            name: "input_power_nominal",
            locations: &[loc(0x15, MemoryType::NvmRwProtectable), loc(0x16, MemoryType::NvmRwProtectable)],
            kind: MemoryValueKind::Numeric,
        },
    ],
};

pub static BANK_202: MemoryBankDescriptor = MemoryBankDescriptor {
    number: 202,
    last_address: 0x0f,
    lock_byte: None,
    latch_byte: Some(0x02),
    values: &[
        MemoryValueDescriptor {
            name: "active_energy",
            locations: &[
                loc(0x04, MemoryType::Rom),
                loc(0x05, MemoryType::NvmRo),
                loc(0x06, MemoryType::NvmRo),
                loc(0x07, MemoryType::NvmRo),
                loc(0x08, MemoryType::NvmRo),
                loc(0x09, MemoryType::NvmRo),
                loc(0x0a, MemoryType::NvmRo),
            ],
            kind: MemoryValueKind::ScaledNumeric,
        },
        MemoryValueDescriptor {
            name: "active_power",
            locations: &[
                loc(0x0b, MemoryType::Rom),
                loc(0x0c, MemoryType::RamRo),
                loc(0x0d, MemoryType::RamRo),
                loc(0x0e, MemoryType::RamRo),
                loc(0x0f, MemoryType::RamRo),
            ],
            kind: MemoryValueKind::ScaledNumeric,
        },
    ],
};

pub static BANK_203: MemoryBankDescriptor = MemoryBankDescriptor {
    number: 203,
    last_address: 0x0f,
    lock_byte: None,
    latch_byte: Some(0x02),
    values: &[
        MemoryValueDescriptor {
            name: "apparent_energy",
            locations: &[
                loc(0x04, MemoryType::Rom),
                loc(0x05, MemoryType::NvmRo),
                loc(0x06, MemoryType::NvmRo),
                loc(0x07, MemoryType::NvmRo),
                loc(0x08, MemoryType::NvmRo),
                loc(0x09, MemoryType::NvmRo),
                loc(0x0a, MemoryType::NvmRo),
            ],
            kind: MemoryValueKind::ScaledNumeric,
        },
        MemoryValueDescriptor {
            name: "apparent_power",
            locations: &[
                loc(0x0b, MemoryType::Rom),
                loc(0x0c, MemoryType::RamRo),
                loc(0x0d, MemoryType::RamRo),
                loc(0x0e, MemoryType::RamRo),
                loc(0x0f, MemoryType::RamRo),
            ],
            kind: MemoryValueKind::ScaledNumeric,
        },
    ],
};

pub static BANK_204: MemoryBankDescriptor = MemoryBankDescriptor {
    number: 204,
    last_address: 0x0f,
    lock_byte: None,
    latch_byte: Some(0x02),
    values: &[
        MemoryValueDescriptor {
            name: "active_energy_loadside",
            locations: &[
                loc(0x04, MemoryType::Rom),
                loc(0x05, MemoryType::NvmRo),
                loc(0x06, MemoryType::NvmRo),
                loc(0x07, MemoryType::NvmRo),
                loc(0x08, MemoryType::NvmRo),
                loc(0x09, MemoryType::NvmRo),
                loc(0x0a, MemoryType::NvmRo),
            ],
            kind: MemoryValueKind::ScaledNumeric,
        },
        MemoryValueDescriptor {
            name: "active_power_loadside",
            locations: &[
                loc(0x0b, MemoryType::Rom),
                loc(0x0c, MemoryType::RamRo),
                loc(0x0d, MemoryType::RamRo),
                loc(0x0e, MemoryType::RamRo),
                loc(0x0f, MemoryType::RamRo),
            ],
            kind: MemoryValueKind::ScaledNumeric,
        },
    ],
};

pub static BANK_205: MemoryBankDescriptor = MemoryBankDescriptor {
    number: 205,
    last_address: 0x0d,
    lock_byte: None,
    latch_byte: None,
    values: &[
        MemoryValueDescriptor {
            name: "control_gear_operating_time",
            locations: &[
                loc(0x04, MemoryType::NvmRo),
                loc(0x05, MemoryType::NvmRo),
                loc(0x06, MemoryType::NvmRo),
                loc(0x07, MemoryType::NvmRo),
            ],
            kind: MemoryValueKind::Numeric,
        },
        MemoryValueDescriptor {
            name: "control_gear_start_counter",
            locations: &[loc(0x08, MemoryType::NvmRo), loc(0x09, MemoryType::NvmRo), loc(0x0a, MemoryType::NvmRo)],
            kind: MemoryValueKind::Numeric,
        },
        MemoryValueDescriptor {
            name: "control_gear_external_supply_voltage",
            locations: &[loc(0x0b, MemoryType::Rom), loc(0x0c, MemoryType::RamRo)],
            kind: MemoryValueKind::FixedScaleNumeric { scale: 1 },
        },
        MemoryValueDescriptor {
            name: "control_gear_external_supply_voltage_frequency",
            locations: &[loc(0x0d, MemoryType::RamRo)],
            kind: MemoryValueKind::Numeric,
        },
    ],
};

pub static BANK_207: MemoryBankDescriptor = MemoryBankDescriptor {
    number: 207,
    last_address: 0x07,
    lock_byte: Some(0x02),
    latch_byte: None,
    values: &[
        MemoryValueDescriptor {
            name: "luminaire_maintenance_bank_version",
            locations: &[loc(0x03, MemoryType::Rom)],
            kind: MemoryValueKind::Numeric,
        },
        MemoryValueDescriptor {
            name: "rated_median_useful_life_of_luminaire",
            locations: &[loc(0x04, MemoryType::NvmRwProtectable)],
            kind: MemoryValueKind::FixedScaleNumeric { scale: -3 },
        },
        MemoryValueDescriptor {
            name: "internal_control_gear_reference_temperature",
            locations: &[loc(0x05, MemoryType::NvmRwProtectable)],
            kind: MemoryValueKind::Temperature,
        },
    ],
};

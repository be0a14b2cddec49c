mod gearset;

pub use gearset::FileGearsetRepository;

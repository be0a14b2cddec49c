mod gearset;

pub use gearset::InMemoryGearsetRepository;

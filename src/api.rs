pub mod enphase;

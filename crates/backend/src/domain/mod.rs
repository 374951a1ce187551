pub mod a001_hotel;
pub mod a002_room;
pub mod a003_review;
pub mod a004_umrah_package;

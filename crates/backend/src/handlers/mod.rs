pub mod a001_hotel;
pub mod a002_room;
pub mod a003_review;
pub mod a004_umrah_package;
pub mod currency;
pub mod u501_hotel_details;
pub mod u502_publish_listing;

pub mod u501_hotel_details;
pub mod u502_publish_listing;

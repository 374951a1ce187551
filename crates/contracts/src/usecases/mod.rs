pub mod u501_hotel_details;
pub mod u502_property_listing;
pub mod u503_umrah_package;

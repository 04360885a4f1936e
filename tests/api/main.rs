mod analyze_website;
mod fetcher;
mod generate_description;
mod health_check;
mod helpers;

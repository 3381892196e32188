//! The catalog shipped with the application.

use super::CatalogItem;

const SAMPLE_BUCKET: &str = "https://commondatastorage.googleapis.com/gtv-videos-bucket/sample";
const THUMBNAIL_HOST: &str = "https://images.unsplash.com";

struct Entry {
    id: &'static str,
    title: &'static str,
    description: &'static str,
    thumbnail: &'static str,
    duration: &'static str,
    release_year: u16,
    genres: &'static [&'static str],
    age_rating: &'static str,
    video: &'static str,
    featured: bool,
    trending: bool,
}

const ENTRIES: &[Entry] = &[
    Entry {
        id: "1",
        title: "Cosmos: A Spacetime Odyssey",
        description: "An exploration of our discovery of the laws of nature and coordinates in space and time.",
        thumbnail: "photo-1465101162946-4377e57745c3",
        duration: "45m",
        release_year: 2014,
        genres: &["Documentary", "Science", "Space"],
        age_rating: "PG",
        video: "ElephantsDream.mp4",
        featured: true,
        trending: false,
    },
    Entry {
        id: "2",
        title: "Planet Earth II",
        description: "Wildlife documentary series with David Attenborough.",
        thumbnail: "photo-1552799446-159ba9523315",
        duration: "50m",
        release_year: 2016,
        genres: &["Documentary", "Nature", "Wildlife"],
        age_rating: "G",
        video: "BigBuckBunny.mp4",
        featured: true,
        trending: false,
    },
    Entry {
        id: "3",
        title: "Our Planet",
        description: "Documentary focusing on the preservation of Earth and its animal inhabitants.",
        thumbnail: "photo-1572016430487-dcfb05c39901",
        duration: "48m",
        release_year: 2019,
        genres: &["Documentary", "Nature", "Environment"],
        age_rating: "PG",
        video: "ForBiggerBlazes.mp4",
        featured: true,
        trending: false,
    },
    Entry {
        id: "4",
        title: "The Blue Planet",
        description: "Explores the deepest parts of the ocean, revealing exotic marine life.",
        thumbnail: "photo-1498330177096-689e3fb901ca",
        duration: "42m",
        release_year: 2001,
        genres: &["Documentary", "Nature", "Ocean"],
        age_rating: "G",
        video: "ForBiggerEscapes.mp4",
        featured: false,
        trending: true,
    },
    Entry {
        id: "5",
        title: "Frozen Planet",
        description: "Documentary series focusing on life and the environment in both the Arctic and Antarctic.",
        thumbnail: "photo-1518134346374-184f9d21cea2",
        duration: "46m",
        release_year: 2011,
        genres: &["Documentary", "Nature", "Arctic"],
        age_rating: "PG",
        video: "ForBiggerFun.mp4",
        featured: false,
        trending: true,
    },
    Entry {
        id: "6",
        title: "Night on Earth",
        description: "Using the latest camera technology, this documentary reveals the behavior of wildlife after dark.",
        thumbnail: "photo-1454789548928-9efd52dc4031",
        duration: "48m",
        release_year: 2020,
        genres: &["Documentary", "Nature", "Wildlife"],
        age_rating: "PG",
        video: "ForBiggerJoyrides.mp4",
        featured: false,
        trending: true,
    },
    Entry {
        id: "7",
        title: "The Hunt",
        description: "Documentary following predators and their prey in the wild.",
        thumbnail: "photo-1526631310638-79a2c5924247",
        duration: "50m",
        release_year: 2015,
        genres: &["Documentary", "Nature", "Wildlife"],
        age_rating: "PG",
        video: "ForBiggerMeltdowns.mp4",
        featured: false,
        trending: false,
    },
    Entry {
        id: "8",
        title: "Africa",
        description: "Explore the wonders and challenges of wildlife across Africa.",
        thumbnail: "photo-1516426122078-c23e76319801",
        duration: "48m",
        release_year: 2013,
        genres: &["Documentary", "Nature", "Wildlife"],
        age_rating: "G",
        video: "Sintel.mp4",
        featured: false,
        trending: false,
    },
    Entry {
        id: "9",
        title: "Seven Worlds, One Planet",
        description: "Documentary focusing on the unique wildlife of each continent.",
        thumbnail: "photo-1451187580459-43490279c0fa",
        duration: "52m",
        release_year: 2019,
        genres: &["Documentary", "Nature", "Wildlife"],
        age_rating: "PG",
        video: "SubaruOutbackOnStreetAndDirt.mp4",
        featured: false,
        trending: false,
    },
    Entry {
        id: "10",
        title: "Wild Alaska",
        description: "Documentary exploring the harsh wilderness of Alaska.",
        thumbnail: "photo-1531002177377-549eb3e3e12b",
        duration: "44m",
        release_year: 2018,
        genres: &["Documentary", "Nature", "Wildlife"],
        age_rating: "PG",
        video: "TearsOfSteel.mp4",
        featured: false,
        trending: false,
    },
];

pub(super) fn builtin_items() -> Vec<CatalogItem> {
    ENTRIES
        .iter()
        .map(|entry| CatalogItem {
            id: entry.id.to_string(),
            title: entry.title.to_string(),
            description: entry.description.to_string(),
            thumbnail: format!("{THUMBNAIL_HOST}/{}?q=80&w=1000", entry.thumbnail),
            duration: entry.duration.to_string(),
            release_year: entry.release_year,
            genres: entry.genres.iter().map(|g| (*g).to_string()).collect(),
            age_rating: entry.age_rating.to_string(),
            video_url: format!("{SAMPLE_BUCKET}/{}", entry.video),
            downloadable: true,
            is_featured: entry.featured,
            is_trending: entry.trending,
        })
        .collect()
}

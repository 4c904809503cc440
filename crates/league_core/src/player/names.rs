use rand::seq::SliceRandom;
use rand::Rng;

const FIRST_NAMES: &[&str] = &[
    "Aaron", "Adrian", "Alex", "Andre", "Anthony", "Austin", "Ben", "Brandon", "Bryce", "Caleb",
    "Cameron", "Chris", "Cole", "Damian", "Darius", "David", "Derek", "Devin", "Dominic", "Dylan",
    "Elijah", "Eric", "Evan", "Gabriel", "Grant", "Isaiah", "Jalen", "Jamal", "Jared", "Jason",
    "Javier", "Jordan", "Josh", "Julian", "Justin", "Kevin", "Kyle", "Lamar", "Lucas", "Malik",
    "Marcus", "Mario", "Mason", "Matt", "Miles", "Nate", "Nick", "Noah", "Omar", "Paul", "Quentin",
    "Ray", "Reggie", "Ryan", "Sam", "Sean", "Terrence", "Trey", "Tyler", "Victor", "Wes", "Xavier",
    "Zach",
];

const LAST_NAMES: &[&str] = &[
    "Adams", "Allen", "Anderson", "Bailey", "Baker", "Banks", "Bell", "Brooks", "Brown", "Bryant",
    "Carter", "Clark", "Coleman", "Collins", "Cooper", "Davis", "Edwards", "Evans", "Fisher",
    "Foster", "Garcia", "Gordon", "Graham", "Green", "Griffin", "Hall", "Harris", "Hayes", "Hill",
    "Howard", "Hughes", "Jackson", "James", "Jenkins", "Johnson", "Jones", "Kelly", "King", "Lewis",
    "Long", "Martin", "Miller", "Mitchell", "Moore", "Morgan", "Morris", "Murphy", "Nelson",
    "Parker", "Perry", "Phillips", "Powell", "Price", "Reed", "Richardson", "Roberts", "Robinson",
    "Ross", "Russell", "Sanders", "Scott", "Simmons", "Smith", "Stewart", "Taylor", "Thomas",
    "Thompson", "Turner", "Walker", "Ward", "Washington", "Watson", "White", "Williams", "Wilson",
    "Wood", "Wright", "Young",
];

const BIRTHPLACES: &[&str] = &[
    "Atlanta, GA", "Baltimore, MD", "Boston, MA", "Chicago, IL", "Dallas, TX", "Denver, CO",
    "Detroit, MI", "Houston, TX", "Indianapolis, IN", "Los Angeles, CA", "Memphis, TN",
    "Miami, FL", "New Orleans, LA", "New York, NY", "Oakland, CA", "Philadelphia, PA",
    "Phoenix, AZ", "Portland, OR", "Seattle, WA", "St. Louis, MO", "Toronto, Canada",
    "Belgrade, Serbia", "Madrid, Spain", "Lagos, Nigeria", "Paris, France", "Melbourne, Australia",
];

fn pick<R: Rng + ?Sized>(rng: &mut R, list: &[&'static str]) -> &'static str {
    list.choose(rng).copied().unwrap_or("Unknown")
}

pub fn random_name<R: Rng + ?Sized>(rng: &mut R) -> String {
    format!("{} {}", pick(rng, FIRST_NAMES), pick(rng, LAST_NAMES))
}

pub fn random_birthplace<R: Rng + ?Sized>(rng: &mut R) -> String {
    pick(rng, BIRTHPLACES).to_string()
}

//! Place names that mark a catalogue segment as targeting audiences outside the United States.
//!
//! Matching is case-insensitive on word boundaries, so entries are stored in their natural
//! casing. Some entries (for example "London" or "Georgia") collide with US place names; the
//! catalogue policy accepts those false positives.

pub const EUROPEAN_CITIES: &[&str] = &[
	"Amsterdam", "Athens", "Barcelona", "Berlin", "Brussels", "Budapest", "Copenhagen", "Dublin",
	"Frankfurt", "Hamburg", "Helsinki", "Lisbon", "Madrid", "Milan", "Munich", "Paris", "Prague",
	"Rome", "Stockholm", "Vienna", "Warsaw", "Bucharest", "Sofia", "Zagreb", "Riga", "Vilnius",
	"Tallinn", "Ljubljana", "Bratislava", "Luxembourg City", "Valletta", "Nicosia", "Porto",
	"Marseille", "Lyon", "Toulouse", "Nice", "Bordeaux", "Lille", "Seville", "Valencia",
	"Zaragoza", "Málaga", "Naples", "Turin", "Palermo", "Genoa", "Bologna", "Florence",
	"Gothenburg", "Malmö", "Aarhus", "Odense", "Antwerp", "Ghent", "Rotterdam", "The Hague",
	"Utrecht", "Eindhoven", "Krakow", "Lodz", "Wroclaw", "Poznan", "Gdansk", "Szczecin", "Graz",
	"Linz", "Salzburg", "Innsbruck", "Cork", "Galway", "Limerick", "Brno", "Ostrava", "Plzen",
	"Košice", "Thessaloniki", "Patras", "Heraklion", "Larissa", "Volos", "Cluj-Napoca",
	"Timisoara", "Iasi", "Constanta", "Craiova", "Brasov", "Gdynia", "Bydgoszcz", "Lublin",
	"Katowice", "Bialystok", "Varna", "Plovdiv", "Burgas", "Ruse", "Split", "Rijeka", "Osijek",
	"Zadar", "Pula", "Tartu", "Narva", "Pärnu", "Kaunas", "Klaipeda", "Siauliai", "Panevezys",
	"Daugavpils", "Liepaja", "Jelgava", "Maribor", "Celje", "Kranj", "Velenje", "Koper", "Trnava",
	"Nitra", "Presov", "Zilina", "Banská Bystrica", "Gyor", "Pecs", "Szeged", "Debrecen",
	"Miskolc", "Nyíregyháza", "Kecskemét",
];

pub const ASIAN_CITIES: &[&str] = &[
	"Tokyo", "Delhi", "Shanghai", "Mumbai", "Beijing", "Dhaka", "Karachi", "Seoul", "Jakarta",
	"Manila", "Osaka", "Bangkok", "Singapore", "Kuala Lumpur", "Ho Chi Minh City", "Hong Kong",
	"Taipei", "Hanoi", "Riyadh", "Baghdad", "Ankara", "Kolkata", "Chennai", "Bangalore", "Lahore",
	"Chongqing", "Tianjin", "Shenzhen", "Wuhan", "Guangzhou", "Chengdu", "Nagoya", "Sapporo",
	"Fukuoka", "Kyoto", "Yangon", "Phnom Penh", "Vientiane", "Kathmandu", "Colombo", "Ulaanbaatar",
	"Thimphu", "Dushanbe", "Bishkek", "Tashkent", "Astana", "Almaty", "Baku", "Yerevan", "Tbilisi",
	"Muscat", "Doha", "Kuwait City", "Manama", "Abu Dhabi", "Dubai", "Jeddah", "Mecca", "Medina",
	"Damascus", "Aleppo", "Beirut", "Amman", "Jerusalem", "Tel Aviv", "Tehran", "Isfahan",
	"Shiraz", "Mashhad", "Kabul", "Islamabad", "Rawalpindi", "Faisalabad", "Hyderabad",
	"Ahmedabad", "Pune", "Surat", "Jaipur", "Lucknow", "Kanpur", "Nagpur", "Indore", "Thane",
	"Bhopal", "Visakhapatnam", "Pimpri-Chinchwad", "Patna", "Vadodara", "Ghaziabad", "Ludhiana",
	"Agra", "Nashik", "Faridabad", "Meerut", "Rajkot", "Kalyan-Dombivli", "Vasai-Virar",
	"Varanasi", "Srinagar", "Aurangabad", "Dhanbad", "Amritsar", "Navi Mumbai", "Allahabad",
	"Ranchi", "Howrah", "Coimbatore", "Jabalpur", "Gwalior", "Vijayawada", "Jodhpur", "Madurai",
	"Raipur", "Kota", "Guwahati", "Chandigarh", "Solapur", "Hubballi-Dharwad", "Tiruchirappalli",
	"Bareilly", "Mysore", "Tiruppur", "Gurgaon", "Aligarh", "Jalandhar",
];

pub const SOUTH_AMERICAN_CITIES: &[&str] = &[
	"São Paulo", "Lima", "Bogotá", "Rio de Janeiro", "Santiago", "Caracas", "Buenos Aires",
	"Salvador", "Brasília", "Fortaleza", "Belo Horizonte", "Medellín", "Cali", "Quito",
	"Guayaquil", "Recife", "Porto Alegre", "Montevideo", "Asunción", "La Paz", "Santa Cruz",
	"Cochabamba", "Curitiba", "Manaus", "Belém", "Goiânia", "Guarulhos", "Campinas", "São Luís",
	"São Gonçalo", "Maceió", "Duque de Caxias", "Natal", "Teresina", "Campo Grande",
	"Barranquilla", "Cartagena", "Córdoba", "Rosario", "Mendoza", "Maracaibo", "Valencia",
	"Barquisimeto", "Cuenca", "Arequipa", "Trujillo", "Chiclayo", "Piura", "Cusco", "Santa Fe",
	"Mar del Plata", "Salta", "San Miguel de Tucumán", "Concepción", "Valparaíso", "Viña del Mar",
	"Antofagasta", "Temuco", "Rancagua", "Talca", "Arica", "Iquique", "Puerto Montt",
	"Punta Arenas", "Georgetown", "Paramaribo", "Cayenne", "Sucre", "Florianópolis", "João Pessoa",
	"Aracaju", "Cuiabá", "Porto Velho", "Macapá", "Boa Vista", "Palmas", "Vitória", "Vila Velha",
	"Santos", "São José dos Campos", "Ribeirão Preto", "Pelotas", "Caxias do Sul", "Joinville",
	"Londrina", "Juiz de Fora", "Niterói",
];

pub const CANADIAN_CITIES: &[&str] = &[
	"Toronto", "Montreal", "Vancouver", "Calgary", "Edmonton", "Ottawa", "Winnipeg", "Quebec City",
	"Hamilton", "Kitchener", "London", "Victoria", "Halifax", "Oshawa", "Windsor", "Saskatoon",
	"Regina", "St. Catharines", "Kelowna", "Barrie", "Sherbrooke", "Guelph", "Kanata",
	"Abbotsford", "Trois-Rivières", "Kingston", "Milton", "Thunder Bay", "St. John's", "Moncton",
	"Nanaimo", "Sudbury", "Brantford", "Fredericton", "Red Deer", "Lethbridge", "Kamloops",
	"Prince George", "Medicine Hat", "Drummondville", "Saint John", "Chilliwack", "Belleville",
	"North Bay", "Cornwall", "Shawinigan", "Courtenay", "Joliette", "Victoriaville",
	"Chatham-Kent", "Sault Ste. Marie", "Wood Buffalo", "Charlottetown", "Rimouski",
	"Saint-Hyacinthe", "Granby", "St. Albert", "Prince Albert", "Sarnia", "Saguenay",
	"Peterborough", "Repentigny", "Vernon", "Grande Prairie", "Airdrie", "Blainville",
	"Saint-Jérôme", "Newmarket", "Brossard", "Châteauguay", "Whitehorse", "Yellowknife", "Iqaluit",
];

pub const MEXICAN_CITIES: &[&str] = &[
	"Mexico City", "Guadalajara", "Monterrey", "Puebla", "Tijuana", "León", "Juárez", "Zapopan",
	"Mérida", "San Luis Potosí", "Querétaro", "Morelia", "Aguascalientes", "Hermosillo",
	"Saltillo", "Mexicali", "Culiacán", "Acapulco", "Cancún", "Chihuahua", "Tampico", "Veracruz",
	"Toluca", "Mazatlán", "Tuxtla Gutiérrez", "Ciudad Obregón", "Ensenada", "Durango",
	"Chimalhuacán", "Tlaquepaque", "Tonalá", "Cuernavaca", "Guadalupe", "Tlalnepantla", "Reynosa",
	"Irapuato", "Torreón", "Centro", "Coatzacoalcos", "Uruapan", "Victoria", "Benito Juárez",
	"Villahermosa", "Tepic", "Ixtapaluca", "Xalapa", "Celaya", "Oaxaca", "Coacalco", "Campeche",
	"Pachuca", "General Escobedo", "Ecatepec", "Naucalpan", "Xico", "Apodaca", "Los Mochis",
	"Cuautitlán Izcalli", "Matamoros", "Tapachula", "Nicolás Romero", "Chetumal", "Nuevo Laredo",
	"Zacatecas", "Playa del Carmen", "La Paz", "Poza Rica",
];

pub const ABBREVIATIONS: &[&str] = &[
	"UK", "EU", "UAE", "KSA", "PRC", "ROK", "DPRK", "RSA", "DRC", "CAR", "ROC", "HKSAR", "ROI",
	"NZ", "PNG", "AU", "CA",
];

pub const COUNTRIES: &[&str] = &[
	"afghanistan", "albania", "algeria", "andorra", "angola", "antigua and barbuda", "argentina",
	"armenia", "australia", "austria", "azerbaijan", "bahamas", "bahrain", "bangladesh",
	"barbados", "belarus", "belgium", "belize", "benin", "bhutan", "bolivia",
	"bosnia and herzegovina", "botswana", "brazil", "brunei", "bulgaria", "burkina faso",
	"burundi", "cabo verde", "cambodia", "cameroon", "canada", "central african republic", "chad",
	"chile", "china", "colombia", "comoros", "congo", "costa rica", "croatia", "cuba", "cyprus",
	"czech republic", "côte d'ivoire", "denmark", "djibouti", "dominica", "dominican republic",
	"ecuador", "egypt", "el salvador", "equatorial guinea", "eritrea", "estonia", "eswatini",
	"ethiopia", "fiji", "finland", "france", "gabon", "gambia", "georgia", "germany", "ghana",
	"greece", "grenada", "guatemala", "guinea", "guinea-bissau", "guyana", "haiti", "honduras",
	"hungary", "iceland", "india", "indonesia", "iran", "iraq", "ireland", "israel", "italy",
	"jamaica", "japan", "jordan", "kazakhstan", "kenya", "kiribati", "kuwait", "kyrgyzstan",
	"laos", "latvia", "lebanon", "lesotho", "liberia", "libya", "liechtenstein", "lithuania",
	"luxembourg", "madagascar", "malawi", "malaysia", "maldives", "mali", "malta",
	"marshall islands", "mauritania", "mauritius", "mexico", "micronesia", "moldova", "monaco",
	"mongolia", "montenegro", "morocco", "mozambique", "myanmar", "namibia", "nauru", "nepal",
	"netherlands", "new zealand", "nicaragua", "niger", "nigeria", "north korea",
	"north macedonia", "norway", "oman", "pakistan", "palau", "palestine", "panama",
	"papua new guinea", "paraguay", "peru", "philippines", "poland", "portugal", "qatar",
	"romania", "russia", "rwanda", "saint kitts and nevis", "saint lucia",
	"saint vincent and the grenadines", "samoa", "san marino", "sao tome and principe",
	"saudi arabia", "senegal", "serbia", "seychelles", "sierra leone", "singapore", "slovakia",
	"slovenia", "solomon islands", "somalia", "south africa", "south korea", "south sudan",
	"spain", "sri lanka", "sudan", "suriname", "sweden", "switzerland", "syria", "taiwan",
	"tajikistan", "tanzania", "thailand", "timor-leste", "togo", "tonga", "trinidad and tobago",
	"tunisia", "turkey", "turkmenistan", "tuvalu", "uganda", "ukraine", "united arab emirates",
	"united kingdom", "uruguay", "uzbekistan", "vanuatu", "vatican city", "venezuela", "vietnam",
	"yemen", "zambia", "zimbabwe",
];

/// Every list above, in a fixed order. Duplicates across lists are harmless for matching.
pub fn non_us_locations() -> impl Iterator<Item = &'static str> {
	[
		EUROPEAN_CITIES,
		ASIAN_CITIES,
		SOUTH_AMERICAN_CITIES,
		CANADIAN_CITIES,
		MEXICAN_CITIES,
		ABBREVIATIONS,
		COUNTRIES,
	]
	.into_iter()
	.flat_map(|list| list.iter().copied())
}

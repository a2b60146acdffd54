//! Static province → city → coordinate table.
//!
//! Backs the structured picker and the snapping of IP-derived city names
//! onto known entries. Iteration order is table order.

use crate::types::Location;

struct KnownCity {
    province: &'static str,
    name: &'static str,
    lat: f64,
    lon: f64,
    /// Latin spellings IP providers report ("Jinan" for 济南市).
    aliases: &'static [&'static str],
}

const CITIES: &[KnownCity] = &[
    KnownCity { province: "北京", name: "北京市", lat: 39.9042, lon: 116.4074, aliases: &["Beijing", "Peking"] },
    KnownCity { province: "上海", name: "上海市", lat: 31.2304, lon: 121.4737, aliases: &["Shanghai"] },
    KnownCity { province: "天津", name: "天津市", lat: 39.3434, lon: 117.3616, aliases: &["Tianjin"] },
    KnownCity { province: "重庆", name: "重庆市", lat: 29.5630, lon: 106.5516, aliases: &["Chongqing"] },
    KnownCity { province: "山东", name: "济南市", lat: 36.6512, lon: 117.1201, aliases: &["Jinan"] },
    KnownCity { province: "山东", name: "青岛市", lat: 36.0671, lon: 120.3826, aliases: &["Qingdao"] },
    KnownCity { province: "山东", name: "烟台市", lat: 37.4638, lon: 121.4479, aliases: &["Yantai"] },
    KnownCity { province: "山东", name: "潍坊市", lat: 36.7069, lon: 119.1619, aliases: &["Weifang"] },
    KnownCity { province: "山东", name: "临沂市", lat: 35.1041, lon: 118.3564, aliases: &["Linyi"] },
    KnownCity { province: "广东", name: "广州市", lat: 23.1291, lon: 113.2644, aliases: &["Guangzhou", "Canton"] },
    KnownCity { province: "广东", name: "深圳市", lat: 22.5431, lon: 114.0579, aliases: &["Shenzhen"] },
    KnownCity { province: "广东", name: "珠海市", lat: 22.2710, lon: 113.5767, aliases: &["Zhuhai"] },
    KnownCity { province: "广东", name: "东莞市", lat: 23.0207, lon: 113.7518, aliases: &["Dongguan"] },
    KnownCity { province: "江苏", name: "南京市", lat: 32.0603, lon: 118.7969, aliases: &["Nanjing"] },
    KnownCity { province: "江苏", name: "苏州市", lat: 31.2990, lon: 120.5853, aliases: &["Suzhou"] },
    KnownCity { province: "江苏", name: "无锡市", lat: 31.4912, lon: 120.3119, aliases: &["Wuxi"] },
    KnownCity { province: "浙江", name: "杭州市", lat: 30.2741, lon: 120.1551, aliases: &["Hangzhou"] },
    KnownCity { province: "浙江", name: "宁波市", lat: 29.8683, lon: 121.5440, aliases: &["Ningbo"] },
    KnownCity { province: "浙江", name: "温州市", lat: 27.9943, lon: 120.6994, aliases: &["Wenzhou"] },
    KnownCity { province: "四川", name: "成都市", lat: 30.5728, lon: 104.0668, aliases: &["Chengdu"] },
    KnownCity { province: "四川", name: "绵阳市", lat: 31.4675, lon: 104.6796, aliases: &["Mianyang"] },
    KnownCity { province: "湖北", name: "武汉市", lat: 30.5928, lon: 114.3055, aliases: &["Wuhan"] },
    KnownCity { province: "湖北", name: "宜昌市", lat: 30.6919, lon: 111.2865, aliases: &["Yichang"] },
    KnownCity { province: "湖南", name: "长沙市", lat: 28.2282, lon: 112.9388, aliases: &["Changsha"] },
    KnownCity { province: "河南", name: "郑州市", lat: 34.7466, lon: 113.6253, aliases: &["Zhengzhou"] },
    KnownCity { province: "河南", name: "洛阳市", lat: 34.6197, lon: 112.4540, aliases: &["Luoyang"] },
    KnownCity { province: "河北", name: "石家庄市", lat: 38.0428, lon: 114.5149, aliases: &["Shijiazhuang"] },
    KnownCity { province: "陕西", name: "西安市", lat: 34.3416, lon: 108.9398, aliases: &["Xi'an", "Xian"] },
    KnownCity { province: "福建", name: "福州市", lat: 26.0745, lon: 119.2965, aliases: &["Fuzhou"] },
    KnownCity { province: "福建", name: "厦门市", lat: 24.4798, lon: 118.0894, aliases: &["Xiamen", "Amoy"] },
    KnownCity { province: "辽宁", name: "沈阳市", lat: 41.8057, lon: 123.4315, aliases: &["Shenyang"] },
    KnownCity { province: "辽宁", name: "大连市", lat: 38.9140, lon: 121.6147, aliases: &["Dalian"] },
    KnownCity { province: "黑龙江", name: "哈尔滨市", lat: 45.8038, lon: 126.5350, aliases: &["Harbin"] },
    KnownCity { province: "云南", name: "昆明市", lat: 25.0389, lon: 102.7183, aliases: &["Kunming"] },
    KnownCity { province: "海南", name: "海口市", lat: 20.0440, lon: 110.1999, aliases: &["Haikou"] },
    KnownCity { province: "海南", name: "三亚市", lat: 18.2528, lon: 109.5119, aliases: &["Sanya"] },
    KnownCity { province: "新疆", name: "乌鲁木齐市", lat: 43.8256, lon: 87.6168, aliases: &["Urumqi"] },
    KnownCity { province: "西藏", name: "拉萨市", lat: 29.6520, lon: 91.1721, aliases: &["Lhasa"] },
];

#[derive(Debug, Clone, PartialEq)]
pub struct City {
    pub name: String,
    pub lat: f64,
    pub lon: f64,
    pub aliases: Vec<String>,
}

impl City {
    pub fn new(name: &str, lat: f64, lon: f64, aliases: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            lat,
            lon,
            aliases: aliases.iter().map(|a| a.to_string()).collect(),
        }
    }

    /// Bidirectional substring containment against the name and each alias.
    /// Latin aliases compare case-insensitively.
    fn matches(&self, query: &str) -> bool {
        if self.name.contains(query) || query.contains(self.name.as_str()) {
            return true;
        }
        let q = query.to_lowercase();
        self.aliases.iter().any(|alias| {
            let a = alias.to_lowercase();
            a.contains(&q) || q.contains(&a)
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Province {
    pub name: String,
    pub cities: Vec<City>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CityTable {
    provinces: Vec<Province>,
}

impl CityTable {
    pub fn new(provinces: Vec<Province>) -> Self {
        Self { provinces }
    }

    /// The bundled table, grouped by province in declaration order.
    pub fn builtin() -> Self {
        let mut provinces: Vec<Province> = Vec::new();
        for known in CITIES {
            let city = City::new(known.name, known.lat, known.lon, known.aliases);
            match provinces.iter_mut().find(|p| p.name == known.province) {
                Some(p) => p.cities.push(city),
                None => provinces.push(Province {
                    name: known.province.to_string(),
                    cities: vec![city],
                }),
            }
        }
        Self { provinces }
    }

    /// Province names for the picker, sorted.
    pub fn province_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.provinces.iter().map(|p| p.name.clone()).collect();
        names.sort();
        names
    }

    /// City names of a province for the picker, sorted.
    pub fn city_names(&self, province: &str) -> Option<Vec<String>> {
        let p = self.province(province)?;
        let mut names: Vec<String> = p.cities.iter().map(|c| c.name.clone()).collect();
        names.sort();
        Some(names)
    }

    pub fn lookup(&self, province: &str, city: &str) -> Option<Location> {
        let p = self.province(province)?;
        let c = p.cities.iter().find(|c| c.name == city)?;
        Some(Location::new(c.name.clone(), c.lat, c.lon, p.name.clone()))
    }

    pub fn first_city(&self, province: &str) -> Option<Location> {
        let p = self.province(province)?;
        let c = p.cities.first()?;
        Some(Location::new(c.name.clone(), c.lat, c.lon, p.name.clone()))
    }

    /// First entry, in table order, whose name or alias contains or is
    /// contained in `city_name`. An empty name never matches.
    pub fn snap(&self, city_name: &str) -> Option<Location> {
        let query = city_name.trim();
        if query.is_empty() {
            return None;
        }
        self.provinces.iter().find_map(|p| {
            p.cities
                .iter()
                .find(|c| c.matches(query))
                .map(|c| Location::new(c.name.clone(), c.lat, c.lon, p.name.clone()))
        })
    }

    fn province(&self, name: &str) -> Option<&Province> {
        self.provinces.iter().find(|p| p.name == name)
    }
}

impl Default for CityTable {
    fn default() -> Self {
        Self::builtin()
    }
}

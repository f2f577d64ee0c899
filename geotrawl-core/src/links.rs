use crate::model::GpsRecord;

/// Map URLs in store order. Records without usable coordinates are skipped.
pub fn map_links(records: &[GpsRecord]) -> Vec<String> {
    records
        .iter()
        .filter_map(|record| record.map_link.url())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gps::decode_gps_tags;

    #[test]
    fn test_map_links_skip_placeholders() {
        let located = decode_gps_tags(
            "GPS Latitude : 10 deg 30' 0.00\" N\nGPS Longitude : 20 deg 15' 0.00\" E\n\
GPS Latitude Ref : North\nGPS Longitude Ref : East\n",
            "site.example",
        );
        let records = vec![GpsRecord::absent(), located];

        assert_eq!(
            map_links(&records),
            vec!["https://www.google.com/maps?q=10.5,20.25".to_string()]
        );
    }
}

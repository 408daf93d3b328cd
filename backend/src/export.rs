/// Flat CSV rendering of the point log rows, one line per shot, header included.
pub fn rows_to_csv(rows: &[common::PointLogRow]) -> Result<Vec<u8>, crate::Error> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for row in rows {
        writer.serialize(row)?;
    }

    writer
        .into_inner()
        .map_err(|e| crate::Error::Csv(e.into_error().into()))
}

//! DrawingML writers for charts and the drawing part that anchors them.

use std::io::Write;

use crate::workbook::chart::{AnchoredChart, ChartSeries, LineChart};
use crate::workbook::xml_escape;

const CAT_AX_ID: u32 = 10;
const VAL_AX_ID: u32 = 100;

/// Write `xl/charts/chartN.xml` for a line chart.
pub fn write_chart<W: Write>(writer: &mut W, chart: &LineChart) -> std::io::Result<()> {
    write!(
        writer,
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#
    )?;
    write!(
        writer,
        r#"<c:chartSpace xmlns:c="http://schemas.openxmlformats.org/drawingml/2006/chart" "#
    )?;
    write!(
        writer,
        r#"xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" "#
    )?;
    write!(
        writer,
        r#"xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">"#
    )?;
    write!(writer, r#"<c:roundedCorners val="0"/>"#)?;
    write!(writer, r#"<c:style val="{}"/>"#, chart.style)?;

    write!(writer, "<c:chart>")?;
    if let Some(title) = &chart.title {
        write_title(writer, title)?;
        write!(writer, r#"<c:autoTitleDeleted val="0"/>"#)?;
    }

    write!(writer, "<c:plotArea><c:layout/>")?;
    write!(writer, "<c:lineChart>")?;
    write!(writer, r#"<c:grouping val="standard"/>"#)?;
    write!(writer, r#"<c:varyColors val="0"/>"#)?;
    for (i, series) in chart.series.iter().enumerate() {
        write_series(writer, i, series)?;
    }
    write!(writer, r#"<c:marker val="1"/>"#)?;
    write!(
        writer,
        r#"<c:axId val="{CAT_AX_ID}"/><c:axId val="{VAL_AX_ID}"/>"#
    )?;
    write!(writer, "</c:lineChart>")?;

    write_category_axis(writer, chart.x_axis_title.as_deref())?;
    write_value_axis(writer, chart.y_axis_title.as_deref())?;
    write!(writer, "</c:plotArea>")?;

    write!(
        writer,
        r#"<c:legend><c:legendPos val="r"/><c:overlay val="0"/></c:legend>"#
    )?;
    write!(writer, r#"<c:plotVisOnly val="1"/>"#)?;
    write!(writer, r#"<c:dispBlanksAs val="gap"/>"#)?;
    write!(writer, "</c:chart>")?;
    write!(writer, "</c:chartSpace>")?;

    Ok(())
}

fn write_title<W: Write>(writer: &mut W, text: &str) -> std::io::Result<()> {
    write!(writer, "<c:title><c:tx><c:rich>")?;
    write!(writer, "<a:bodyPr/><a:lstStyle/>")?;
    write!(writer, "<a:p><a:pPr><a:defRPr/></a:pPr>")?;
    write!(
        writer,
        r#"<a:r><a:rPr lang="ko-KR"/><a:t>{}</a:t></a:r>"#,
        xml_escape(text)
    )?;
    write!(writer, "</a:p></c:rich></c:tx>")?;
    write!(writer, r#"<c:overlay val="0"/></c:title>"#)?;
    Ok(())
}

fn write_series<W: Write>(writer: &mut W, index: usize, series: &ChartSeries) -> std::io::Result<()> {
    write!(writer, "<c:ser>")?;
    write!(writer, r#"<c:idx val="{index}"/><c:order val="{index}"/>"#)?;

    if let Some((cell, cached)) = &series.name {
        write!(writer, "<c:tx><c:strRef>")?;
        write!(writer, "<c:f>{}</c:f>", xml_escape(&cell.to_formula()))?;
        write!(writer, r#"<c:strCache><c:ptCount val="1"/>"#)?;
        write!(
            writer,
            r#"<c:pt idx="0"><c:v>{}</c:v></c:pt></c:strCache>"#,
            xml_escape(cached)
        )?;
        write!(writer, "</c:strRef></c:tx>")?;
    }

    write!(writer, "<c:cat><c:strRef>")?;
    write!(
        writer,
        "<c:f>{}</c:f>",
        xml_escape(&series.categories.to_formula())
    )?;
    write!(writer, "<c:strCache>")?;
    write!(writer, r#"<c:ptCount val="{}"/>"#, series.category_cache.len())?;
    for (i, label) in series.category_cache.iter().enumerate() {
        write!(
            writer,
            r#"<c:pt idx="{i}"><c:v>{}</c:v></c:pt>"#,
            xml_escape(label)
        )?;
    }
    write!(writer, "</c:strCache></c:strRef></c:cat>")?;

    write!(writer, "<c:val><c:numRef>")?;
    write!(writer, "<c:f>{}</c:f>", xml_escape(&series.values.to_formula()))?;
    write!(writer, "<c:numCache><c:formatCode>General</c:formatCode>")?;
    write!(writer, r#"<c:ptCount val="{}"/>"#, series.value_cache.len())?;
    for (i, v) in series.value_cache.iter().enumerate() {
        write!(writer, r#"<c:pt idx="{i}"><c:v>{v}</c:v></c:pt>"#)?;
    }
    write!(writer, "</c:numCache></c:numRef></c:val>")?;

    write!(writer, r#"<c:smooth val="0"/>"#)?;
    write!(writer, "</c:ser>")?;
    Ok(())
}

fn write_category_axis<W: Write>(writer: &mut W, title: Option<&str>) -> std::io::Result<()> {
    write!(writer, "<c:catAx>")?;
    write!(writer, r#"<c:axId val="{CAT_AX_ID}"/>"#)?;
    write!(writer, r#"<c:scaling><c:orientation val="minMax"/></c:scaling>"#)?;
    write!(writer, r#"<c:delete val="0"/><c:axPos val="b"/>"#)?;
    if let Some(title) = title {
        write_title(writer, title)?;
    }
    write!(writer, r#"<c:majorTickMark val="out"/><c:minorTickMark val="none"/>"#)?;
    write!(writer, r#"<c:tickLblPos val="nextTo"/>"#)?;
    write!(writer, r#"<c:crossAx val="{VAL_AX_ID}"/><c:crosses val="autoZero"/>"#)?;
    write!(writer, r#"<c:auto val="1"/><c:lblAlgn val="ctr"/><c:lblOffset val="100"/>"#)?;
    write!(writer, r#"<c:noMultiLvlLbl val="0"/>"#)?;
    write!(writer, "</c:catAx>")?;
    Ok(())
}

fn write_value_axis<W: Write>(writer: &mut W, title: Option<&str>) -> std::io::Result<()> {
    write!(writer, "<c:valAx>")?;
    write!(writer, r#"<c:axId val="{VAL_AX_ID}"/>"#)?;
    write!(writer, r#"<c:scaling><c:orientation val="minMax"/></c:scaling>"#)?;
    write!(writer, r#"<c:delete val="0"/><c:axPos val="l"/>"#)?;
    write!(writer, "<c:majorGridlines/>")?;
    if let Some(title) = title {
        write_title(writer, title)?;
    }
    write!(writer, r#"<c:numFmt formatCode="General" sourceLinked="1"/>"#)?;
    write!(writer, r#"<c:majorTickMark val="out"/><c:minorTickMark val="none"/>"#)?;
    write!(writer, r#"<c:tickLblPos val="nextTo"/>"#)?;
    write!(writer, r#"<c:crossAx val="{CAT_AX_ID}"/><c:crosses val="autoZero"/>"#)?;
    write!(writer, r#"<c:crossBetween val="between"/>"#)?;
    write!(writer, "</c:valAx>")?;
    Ok(())
}

/// Write `xl/drawings/drawingN.xml`. The chart at position `i` is linked
/// through relationship `rId{i + 1}` of the drawing.
pub fn write_drawing<W: Write>(writer: &mut W, charts: &[AnchoredChart]) -> std::io::Result<()> {
    write!(
        writer,
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#
    )?;
    write!(
        writer,
        r#"<xdr:wsDr xmlns:xdr="http://schemas.openxmlformats.org/drawingml/2006/spreadsheetDrawing" "#
    )?;
    write!(
        writer,
        r#"xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main">"#
    )?;

    for (i, anchored) in charts.iter().enumerate() {
        let id = i + 1;
        let (cx, cy) = anchored.chart.extent_emu();

        // anchor position is 0-based in DrawingML
        write!(writer, "<xdr:oneCellAnchor>")?;
        write!(
            writer,
            "<xdr:from><xdr:col>{}</xdr:col><xdr:colOff>0</xdr:colOff><xdr:row>{}</xdr:row><xdr:rowOff>0</xdr:rowOff></xdr:from>",
            anchored.col - 1,
            anchored.row - 1
        )?;
        write!(writer, r#"<xdr:ext cx="{cx}" cy="{cy}"/>"#)?;
        write!(writer, r#"<xdr:graphicFrame macro="">"#)?;
        write!(
            writer,
            r#"<xdr:nvGraphicFramePr><xdr:cNvPr id="{id}" name="Chart {id}"/><xdr:cNvGraphicFramePr/></xdr:nvGraphicFramePr>"#
        )?;
        write!(
            writer,
            r#"<xdr:xfrm><a:off x="0" y="0"/><a:ext cx="0" cy="0"/></xdr:xfrm>"#
        )?;
        write!(
            writer,
            r#"<a:graphic><a:graphicData uri="http://schemas.openxmlformats.org/drawingml/2006/chart">"#
        )?;
        write!(
            writer,
            r#"<c:chart xmlns:c="http://schemas.openxmlformats.org/drawingml/2006/chart" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" r:id="rId{id}"/>"#
        )?;
        write!(writer, "</a:graphicData></a:graphic></xdr:graphicFrame>")?;
        write!(writer, "<xdr:clientData/></xdr:oneCellAnchor>")?;
    }

    write!(writer, "</xdr:wsDr>")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workbook::chart::CellRange;

    fn sample_chart() -> LineChart {
        let mut chart = LineChart::new()
            .title("일간 온도 추이")
            .x_axis_title("시간")
            .y_axis_title("온도 (°C)")
            .size_cm(25.0, 15.0);
        for row in 2..=3 {
            chart.add_series(ChartSeries {
                name: Some((CellRange::cell("S", row, 1), format!("day {row}"))),
                categories: CellRange::row("S", 1, 2, 3),
                category_cache: vec!["0:00".into(), "0:01".into()],
                values: CellRange::row("S", row, 2, 3),
                value_cache: vec![24.1, 24.9],
            });
        }
        chart
    }

    #[test]
    fn chart_xml_lists_every_series() {
        let mut buf = Vec::new();
        write_chart(&mut buf, &sample_chart()).unwrap();
        let xml = String::from_utf8(buf).unwrap();

        assert_eq!(xml.matches("<c:ser>").count(), 2);
        assert_eq!(xml.matches("<c:f>'S'!$B$1:$C$1</c:f>").count(), 2);
        assert!(xml.contains("<c:f>'S'!$B$3:$C$3</c:f>"));
        assert!(xml.contains(r#"<c:pt idx="1"><c:v>24.9</c:v></c:pt>"#));
        assert!(xml.contains("<a:t>일간 온도 추이</a:t>"));
        assert!(xml.contains("<a:t>온도 (°C)</a:t>"));
        assert!(xml.ends_with("</c:chartSpace>"));
    }

    #[test]
    fn drawing_anchors_chart_below_table() {
        let anchored = AnchoredChart {
            row: 12,
            col: 1,
            chart: sample_chart(),
        };
        let mut buf = Vec::new();
        write_drawing(&mut buf, &[anchored]).unwrap();
        let xml = String::from_utf8(buf).unwrap();

        assert!(xml.contains("<xdr:col>0</xdr:col>"));
        assert!(xml.contains("<xdr:row>11</xdr:row>"));
        assert!(xml.contains(r#"<xdr:ext cx="9000000" cy="5400000"/>"#));
        assert!(xml.contains(r#"r:id="rId1""#));
    }
}

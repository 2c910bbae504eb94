//! Built-in forecast report template.

/// HTML page with a per-day table context and an inline chart script. The
/// `__LAST__` guards keep the emitted JavaScript arrays free of trailing
/// commas.
pub fn template() -> &'static str {
    r##"<!DOCTYPE html>
<html>
<head>
    <meta charset="UTF-8" />
    <title><TMPL_VAR REPORTNAME></title>
    <script src="memory:ChartNew.js"></script>
    <script src="memory:sorttable.js"></script>
    <link href="memory:master.css" rel="stylesheet" />
    <style>
        canvas {max-height: 400px; min-height: 100px;}
        body {font-size: <TMPL_VAR HTMLSCALE>%;};
    </style>
</head>
<body>

<div class="container">
<h3><TMPL_VAR REPORTNAME>

<select id="chart-type" onchange='onChartChange(this)'>
    <option value="line" selected>Line Chart</option>
    <option value="bar">Bar Chart</option>
</select>
</h3>
<TMPL_VAR TODAY><hr>

<div class="row">
<div class="col-xs-1"></div>
<div class="col-xs-10">

<canvas id="mycanvas" height="200" width="600"></canvas>
<script>
    var data = {
    labels: [
            <TMPL_LOOP NAME=CONTENTS>
                <TMPL_IF NAME=__LAST__>
                    "<TMPL_VAR DATE>"
                <TMPL_ELSE>
                    "<TMPL_VAR DATE>",
                </TMPL_IF>
            </TMPL_LOOP>
            ],
    datasets: [
        {
            fillColor : 'rgba(129, 172, 123, 0.5)',
            strokeColor : 'rgba(129, 172, 123, 1)',
            pointColor : 'rgba(129, 172, 123, 1)',
            pointStrokeColor : "#fff",
            data : [
                    <TMPL_LOOP NAME=CONTENTS>
                        <TMPL_IF NAME=__LAST__>
                            <TMPL_VAR WITHDRAWAL>
                        <TMPL_ELSE>
                            <TMPL_VAR WITHDRAWAL>,
                        </TMPL_IF>
                    </TMPL_LOOP>
                    ],
            title : "WITHDRAWAL"
        },
        {
            fillColor : 'rgba(129, 172, 123, 0.5)',
            strokeColor : 'rgba(129, 172, 123, 1)',
            pointColor : 'rgba(129, 172, 123, 1)',
            pointStrokeColor : "#fff",
            data : [
                    <TMPL_LOOP NAME=CONTENTS>
                        <TMPL_IF NAME=__LAST__>
                            <TMPL_VAR DEPOSIT>
                        <TMPL_ELSE>
                            <TMPL_VAR DEPOSIT>,
                        </TMPL_IF>
                    </TMPL_LOOP>
                    ],
            title : "DEPOSIT"
        }
        ]
    }
    var opts = { annotateDisplay : true, responsive : true };

    window.onload = function() {
        var myBar = new Chart(document.getElementById("mycanvas").getContext("2d")).Line(data,opts);
    }

    function onChartChange(select){
        var value = select.value;
        if (value == "line") {
           new Chart(document.getElementById("mycanvas").getContext("2d")).Line(data,opts);
        }
        else if (value == "bar") {
           new Chart(document.getElementById("mycanvas").getContext("2d")).Bar(data,opts);
        }
    }

</script>
</div></div></div></body>
</html>
"##
}

/// Confetti burst plus a short chime, played once when a lesson completes.
pub(super) fn finish_script() -> String {
    r##"(function() {
        const root = document.getElementById("lesson-complete") || document.body;
        const colors = ["#58cc02", "#1cb0f6", "#ffc800", "#ff4b4b", "#ce82ff"];
        const layer = document.createElement("div");
        layer.className = "confetti";
        for (let i = 0; i < 80; i++) {
            const piece = document.createElement("span");
            piece.className = "confetti__piece";
            piece.style.left = Math.random() * 100 + "%";
            piece.style.background = colors[i % colors.length];
            piece.style.animationDelay = Math.random() * 0.6 + "s";
            piece.style.transform = "rotate(" + Math.floor(Math.random() * 360) + "deg)";
            layer.appendChild(piece);
        }
        root.appendChild(layer);
        setTimeout(() => layer.remove(), 4000);
        try {
            const Ctx = window.AudioContext || window.webkitAudioContext;
            if (!Ctx) return;
            const ctx = new Ctx();
            [523.25, 659.25, 783.99].forEach((freq, idx) => {
                const osc = ctx.createOscillator();
                const gain = ctx.createGain();
                const start = ctx.currentTime + idx * 0.12;
                osc.frequency.value = freq;
                gain.gain.setValueAtTime(0.15, start);
                gain.gain.exponentialRampToValueAtTime(0.001, start + 0.4);
                osc.connect(gain);
                gain.connect(ctx.destination);
                osc.start(start);
                osc.stop(start + 0.4);
            });
        } catch (_) {}
    })();"##
        .to_string()
}

/// One-shot speech recognition. Posts `{transcript, confidence}` or
/// `{error}` back through `dioxus.send`.
pub(crate) fn speech_recognition_script() -> String {
    r#"(function() {
        const Recognition = window.SpeechRecognition || window.webkitSpeechRecognition;
        if (!Recognition) {
            dioxus.send({ error: "unsupported" });
            return;
        }
        const recognizer = new Recognition();
        recognizer.lang = document.documentElement.lang || "es-ES";
        recognizer.interimResults = false;
        recognizer.maxAlternatives = 1;
        let settled = false;
        recognizer.onresult = (event) => {
            const best = event.results[0] && event.results[0][0];
            settled = true;
            if (best) {
                dioxus.send({ transcript: best.transcript, confidence: best.confidence });
            } else {
                dioxus.send({ error: "no-speech" });
            }
        };
        recognizer.onerror = (event) => {
            if (settled) return;
            settled = true;
            dioxus.send({ error: event.error || "failed" });
        };
        recognizer.onend = () => {
            if (settled) return;
            settled = true;
            dioxus.send({ error: "no-speech" });
        };
        recognizer.start();
    })();"#
        .to_string()
}
